//! Employee directory and session handling.
//!
//! The session manager replaces the original portal's scattered page-level
//! auth checks with one context object resolved per request: handlers take a
//! [`CurrentUser`] (or [`AdminUser`]) extractor and never inspect tokens
//! themselves.

pub mod domain;
pub mod extract;
pub mod repository;
pub mod router;
pub mod session;


pub use domain::{UserId, UserProfile, UserRole};
pub use extract::{AdminUser, AuthRejection, CurrentUser};
pub use repository::{UserRecord, UserRepository};
pub use router::auth_router;
pub use session::{hash_password, AuthError, Session, SessionManager};
