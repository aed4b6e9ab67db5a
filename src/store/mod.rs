//! Application state: the active session and the survey catalog.
//!
//! Both stores are plain objects built once from a shared [`Database`](crate::db::Database)
//! handle and passed by reference to whatever needs them.

mod session;
mod surveys;

pub use session::*;
pub use surveys::*;
