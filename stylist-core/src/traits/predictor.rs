use crate::models::{PredictionRequest, PredictionResponse};

/// Design token prediction.
///
/// Infallible by contract: implementations degrade to static tokens with a
/// low confidence instead of returning an error.
pub trait IPredictor: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> PredictionResponse;
}
