//! Wiring for the Amae Clinic client: one [`AppContext`] owns the session
//! store, the service router and every service built on them.

pub mod context;

pub use context::AppContext;
