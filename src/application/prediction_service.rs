// Prediction service - Remote failure prediction with a canned fallback
use crate::domain::error::MonitorError;
use crate::domain::prediction::{
    PredictionForm, PredictionOutcome, PredictionRequest, PredictionResult, FALLBACK_OUTCOMES,
};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("predictor unreachable: {0}")]
    Transport(String),

    #[error("predictor answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unreadable predictor response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait FailurePredictor: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutcome, PredictionError>;
}

#[derive(Clone)]
pub struct PredictionService {
    predictor: Arc<dyn FailurePredictor>,
    rng: Arc<Mutex<Box<dyn RngCore + Send>>>,
}

impl PredictionService {
    pub fn new(predictor: Arc<dyn FailurePredictor>) -> Self {
        Self::with_rng(predictor, StdRng::from_entropy())
    }

    pub fn with_rng<R: RngCore + Send + 'static>(predictor: Arc<dyn FailurePredictor>, rng: R) -> Self {
        Self {
            predictor,
            rng: Arc::new(Mutex::new(Box::new(rng))),
        }
    }

    /// Validate the form, then ask the predictor
    pub async fn submit(&self, form: &PredictionForm) -> Result<PredictionResult, MonitorError> {
        let request = form.validate().map_err(MonitorError::Validation)?;
        Ok(self.predict(&request).await)
    }

    /// Every predictor failure is answered from the fallback table
    pub async fn predict(&self, request: &PredictionRequest) -> PredictionResult {
        match self.predictor.predict(request).await {
            Ok(outcome) => PredictionResult::Remote(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "prediction failed, answering from fallback table");
                PredictionResult::Fallback {
                    outcome: self.fallback_outcome(),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn fallback_outcome(&self) -> PredictionOutcome {
        let index = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..FALLBACK_OUTCOMES.len()),
            Err(poisoned) => poisoned.into_inner().gen_range(0..FALLBACK_OUTCOMES.len()),
        };
        let (machine_failure, failure_type) = FALLBACK_OUTCOMES[index];
        PredictionOutcome::new(machine_failure, failure_type)
    }
}
