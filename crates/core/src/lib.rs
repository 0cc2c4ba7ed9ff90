//! Domain core for the MetaMind marketplace backend.
//!
//! Pure logic shared by every other crate: the error taxonomy, shared id and
//! timestamp types, upload validation and storage-key naming, text analysis
//! fallback rules, and mint request status transitions. Nothing in this
//! crate performs I/O beyond drawing randomness for storage-key tokens.

pub mod error;
pub mod mint;
pub mod text;
pub mod types;
pub mod upload;

pub use error::CoreError;
