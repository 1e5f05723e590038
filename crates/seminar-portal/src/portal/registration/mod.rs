//! Application lifecycle: the eligibility engine plus the service that
//! guards the `NoApplication -> Applied -> NoApplication` transitions.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationId, ApplicationRecord, ApplicationView};
pub use eligibility::SeminarStatus;
pub use repository::ApplicationRepository;
pub use router::registration_router;
pub use service::{RegistrationError, RegistrationService};
