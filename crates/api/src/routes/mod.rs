//! HTTP route handlers.

pub mod drafts;
pub mod health;
pub mod mint;
pub mod payments;
pub mod products;
pub mod uploads;
