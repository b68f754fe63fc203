use routing_slip::{DispatchError, ItineraryError, SagaOutcome};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load itinerary")]
    Itinerary(#[from] ItineraryError),

    #[error("saga could not be run")]
    Dispatch(#[from] DispatchError),

    #[error("failed to serialize routing slip")]
    Json(#[from] serde_json::Error),

    #[error("saga did not complete: {0}")]
    SagaNotCompleted(SagaOutcome),
}

pub type Result<T> = std::result::Result<T, CliError>;
