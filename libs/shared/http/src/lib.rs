//! HTTP plumbing shared by every cell: one `BackendClient` per backend,
//! bearer-token injection, and the router that builds and caches clients.

pub mod client;
pub mod error_body;
pub mod interceptor;
pub mod router;

pub use client::BackendClient;
pub use interceptor::{AuthInterceptor, TokenProvider};
pub use router::ServiceRouter;
