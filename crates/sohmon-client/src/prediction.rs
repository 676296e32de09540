//! HTTP client for the SOH prediction service

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::time::timeout;

use sohmon_core::{CELL_COUNT, Error, PredictionProvider, PredictionResponse, Result};

use crate::config::ServiceConfig;

/// Client for `POST /predict`
pub struct PredictionClient {
    config: ServiceConfig,
    client: Client,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    u_values: &'a [f64],
}

impl PredictionClient {
    /// Create a new prediction client from configuration
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new prediction client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ServiceConfig::from_env()?)
    }

    async fn perform_predict(&self, cells: &[f64]) -> Result<PredictionResponse> {
        let url = format!("{}/predict", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { u_values: cells })
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Service(format!(
                "prediction request failed with status {}: {}",
                status, error_text
            )));
        }

        response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[async_trait]
impl PredictionProvider for PredictionClient {
    async fn predict(&self, cells: &[f64; CELL_COUNT]) -> Result<PredictionResponse> {
        match timeout(self.config.timeout(), self.perform_predict(cells)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("prediction request timed out".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let cells = [3.5; CELL_COUNT];
        let value = serde_json::to_value(PredictRequest { u_values: &cells }).unwrap();

        let u_values = value["u_values"].as_array().unwrap();
        assert_eq!(u_values.len(), CELL_COUNT);
        assert!(u_values.iter().all(|v| v.as_f64() == Some(3.5)));
    }
}
