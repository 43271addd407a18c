//! Trait definitions for the Saga model gateway.
//!
//! The narrative engine never talks to a provider directly. It hands a
//! [`GenerateRequest`](saga_core::GenerateRequest) to a [`SagaDriver`] and
//! receives one text completion back, or a gateway error.
//!
//! Enable the `testing` feature for [`MockDriver`], a scripted driver that
//! records every request it receives.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

#[cfg(feature = "testing")]
mod testing;

pub use traits::{Health, SagaDriver};
pub use types::HealthStatus;

#[cfg(feature = "testing")]
pub use testing::{MockBehavior, MockDriver, MockResponse};
