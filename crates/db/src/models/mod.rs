//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod draft;
pub mod event;
pub mod mint_request;
pub mod product;
pub mod purchase;

pub use draft::{CreateDraft, Draft};
pub use event::Event;
pub use mint_request::MintRequest;
pub use product::{CreateProduct, Product};
pub use purchase::Purchase;
