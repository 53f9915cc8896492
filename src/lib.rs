//! mr-mirror: mirror accepted GitLab merge requests onto downstream branches
//!
//! A webhook receives merge request events. When an event targets a mapped
//! branch, its commits are cherry-picked onto a fresh working branch rooted at
//! the downstream branch, and the outcome is reported back to GitLab as either
//! a follow-up merge request or an issue listing what did not apply.

pub mod config;
pub mod error;
pub mod mirror;
pub mod platform;
pub mod server;
pub mod types;
