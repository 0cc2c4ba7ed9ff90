//! Payment gateway boundary.
//!
//! Two-phase protocol: a server-side intent creation returning a client
//! secret, then a confirmation against that secret. The purchase
//! orchestrator in `metamind-pipeline` drives both phases and only
//! records a purchase after a successful confirmation.

pub mod gateway;
pub mod http;
pub mod stub;

pub use gateway::{PaymentError, PaymentGateway, PaymentIntent, PaymentOutcome};
pub use http::{HttpPaymentGateway, PaymentConfig};
pub use stub::StubGateway;
