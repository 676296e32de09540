//! Core traits and types for sohmon (battery SOH dashboard client)
//!
//! This crate defines the fundamental traits and types used across the sohmon
//! system. It provides capability-facing interfaces for the prediction and
//! answer services, making the client components test-friendly and keeping the
//! HTTP layer swappable.

pub mod error;
pub mod provider;
pub mod types;

pub use error::{Error, Result};
pub use provider::{AnswerProvider, PredictionProvider};
pub use types::*;
