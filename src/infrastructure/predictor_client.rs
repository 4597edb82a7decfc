// HTTP client for the remote failure predictor
use crate::application::prediction_service::{FailurePredictor, PredictionError};
use crate::domain::prediction::{PredictionOutcome, PredictionRequest};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Request body; the predictor expects numbers as numeric strings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictBody {
    air_temp: String,
    process_temp: String,
    rotational_speed: String,
    torque: String,
    #[serde(rename = "type")]
    machine_type: &'static str,
    tool_wear: String,
}

impl From<&PredictionRequest> for PredictBody {
    fn from(request: &PredictionRequest) -> Self {
        Self {
            air_temp: request.air_temp.to_string(),
            process_temp: request.process_temp.to_string(),
            rotational_speed: request.rotational_speed.to_string(),
            torque: request.torque.to_string(),
            machine_type: request.machine_type.as_str(),
            tool_wear: request.tool_wear.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    url: String,
}

impl HttpPredictor {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl FailurePredictor for HttpPredictor {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutcome, PredictionError> {
        let response = self
            .client
            .post(&self.url)
            .json(&PredictBody::from(request))
            .send()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::Status { status, body });
        }

        response
            .json::<PredictionOutcome>()
            .await
            .map_err(|e| PredictionError::Decode(e.to_string()))
    }
}
