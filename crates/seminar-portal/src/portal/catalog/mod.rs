//! Seminar catalog: the records administrators publish, their category
//! reference data, and per-seminar file attachments.

pub mod categories;
pub mod domain;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use categories::CategoryService;
pub use domain::{
    AttachmentId, AttachmentRecord, AttachmentUpload, CategoryDraft, CategoryId, CategoryRecord,
    SeminarDraft, SeminarId, SeminarRecord, SeminarSearch,
};
pub use repository::{AttachmentRepository, CategoryRepository, SeminarRepository};
pub use router::{category_router, seminar_router};
pub use service::{CatalogError, CatalogService};
pub use views::{AttachmentBatch, AttachmentView, CategoryView, SeminarView};
