//! Durable storage for the single active session on this device.

pub mod store;

pub use store::SessionStore;
