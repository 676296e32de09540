//! Provider traits for the prediction and answer services
//!
//! Both services are black boxes behind a fixed request/response contract;
//! these traits are the seam that lets the client components run against the
//! HTTP implementations or against mocks in tests.

use async_trait::async_trait;

use crate::{AnswerReply, AssistantMode, CELL_COUNT, PredictionResponse, Result};

/// Maps a full voltage vector to an SOH prediction
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    /// Submit one 21-cell voltage vector and await one prediction
    async fn predict(&self, cells: &[f64; CELL_COUNT]) -> Result<PredictionResponse>;
}

/// Maps a (question, mode) pair to an answer plus optional provenance tag
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Ask one question under the given mode and await one answer
    async fn ask(&self, question: &str, mode: AssistantMode) -> Result<AnswerReply>;
}
