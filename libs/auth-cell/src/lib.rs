//! # Auth Cell
//!
//! Login against the auth and doctor backends and the token lifecycle calls
//! around it.
//!
//! The two login endpoints answer with different shapes: the auth backend
//! returns a structured body with a nested user and role list, the doctor
//! backend a flat object without any role. Both are decoded into
//! [`RawLoginResult`] at the HTTP boundary and turned into one
//! [`shared_models::Session`] by [`normalizer::normalize`].
//!
//! Which backend to log in against is chosen by the caller through
//! [`LoginAudience`]. When the caller does not know, the email address is
//! inspected as a fallback (`@doctor.` means doctor).

pub mod audience;
pub mod models;
pub mod normalizer;
pub mod services;

pub use audience::{select_login_target, LoginAudience};
pub use models::{AuthLoginBody, AuthUserBody, DoctorLoginBody, LoginRequest, RawLoginResult, RegisterRequest};
pub use normalizer::normalize;
pub use services::AuthService;
