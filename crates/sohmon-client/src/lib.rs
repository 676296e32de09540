//! HTTP clients for the SOH prediction and chat answer services
//!
//! This crate provides the reqwest implementations of the provider traits.

mod answer;
mod config;
mod prediction;


pub use answer::AnswerClient;
pub use config::{DEFAULT_API_URL, ServiceConfig};
pub use prediction::PredictionClient;

// Re-export core types for convenience
pub use sohmon_core::{
    AnswerProvider, AnswerReply, Error, PredictionProvider, PredictionResponse, Result,
};
