pub mod auth;
pub mod error;
pub mod target;

pub use auth::{Role, Session, SessionTokens, UserIdentity};
pub use error::{ClientError, NormalizationError};
pub use target::{BackendEndpoint, BackendTarget};
