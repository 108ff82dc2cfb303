use thiserror::Error;

use crate::view::states::{ViewEvent, ViewState, ViewStatus};

pub const FETCH_REJECTED_MESSAGE: &str = "Failed to fetch products";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ViewTransitionError {
    #[error("invalid view transition from {state} using event {event}")]
    InvalidTransition { state: ViewStatus, event: &'static str },
    #[error("error state requires a non-empty message")]
    EmptyErrorMessage,
}

impl ViewState {
    /// Computes the state that follows `event`.
    ///
    /// A fetch may start from any state; resolution events are only accepted
    /// while loading.
    pub fn apply(&self, event: ViewEvent) -> Result<ViewState, ViewTransitionError> {
        match (self, event) {
            (_, ViewEvent::FetchStarted) => Ok(ViewState::Loading),
            (ViewState::Loading, ViewEvent::FetchSucceeded(products)) => {
                Ok(ViewState::Loaded { products })
            }
            (ViewState::Loading, ViewEvent::FetchRejected) => {
                Ok(ViewState::Error { message: FETCH_REJECTED_MESSAGE.to_string() })
            }
            (ViewState::Loading, ViewEvent::FetchFailed(message)) => {
                if message.trim().is_empty() {
                    return Err(ViewTransitionError::EmptyErrorMessage);
                }
                Ok(ViewState::Error { message })
            }
            (state, event) => Err(ViewTransitionError::InvalidTransition {
                state: state.status(),
                event: event.name(),
            }),
        }
    }
}
