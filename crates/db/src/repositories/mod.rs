//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod draft_repo;
pub mod event_repo;
pub mod mint_request_repo;
pub mod product_repo;
pub mod purchase_repo;

pub use draft_repo::DraftRepo;
pub use event_repo::EventRepo;
pub use mint_request_repo::MintRequestRepo;
pub use product_repo::ProductRepo;
pub use purchase_repo::PurchaseRepo;
