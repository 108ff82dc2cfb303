//! Drives the catalog view state through fetches.
//!
//! A session owns one [`ViewState`] and publishes every change on a watch
//! channel. At most one fetch runs at a time; a second `load` while one is
//! outstanding is ignored. Closing the session cancels any outstanding fetch
//! so its result is never applied.

use std::sync::atomic::{AtomicBool, Ordering};

use catalog_core::{CatalogSummary, ViewEvent, ViewState};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::source::{CatalogSource, FetchError, ProductsEnvelope};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Failed { message: String },
    /// Another fetch was already outstanding.
    AlreadyInFlight,
    /// The session was closed before the fetch resolved.
    Cancelled,
    /// Retry was requested outside the error state.
    Ignored,
}

pub struct CatalogSession<S> {
    source: S,
    state: watch::Sender<ViewState>,
    in_flight: AtomicBool,
    lifetime: CancellationToken,
}

impl<S: CatalogSource> CatalogSession<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self { source, state, in_flight: AtomicBool::new(false), lifetime: CancellationToken::new() }
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    pub async fn load(&self) -> LoadOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!(event_name = "client.fetch.skipped", reason = "in_flight", "fetch already running");
            return LoadOutcome::AlreadyInFlight;
        };
        if self.lifetime.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        self.transition(ViewEvent::FetchStarted);
        debug!(
            event_name = "client.fetch.started",
            endpoint = %self.source.endpoint(),
            "fetching products"
        );

        let result = tokio::select! {
            biased;
            () = self.lifetime.cancelled() => {
                info!(event_name = "client.fetch.cancelled", "session closed before fetch resolved");
                return LoadOutcome::Cancelled;
            }
            result = self.source.fetch_products() => result,
        };

        let (event, outcome) = self.resolve(result);
        self.transition(event);
        outcome
    }

    /// Re-runs the fetch, but only from the error state.
    pub async fn retry(&self) -> LoadOutcome {
        let retryable = self.state.borrow().error_message().is_some();
        if !retryable {
            debug!(event_name = "client.fetch.skipped", reason = "not_in_error", "retry ignored");
            return LoadOutcome::Ignored;
        }

        self.load().await
    }

    pub fn close(&self) {
        self.lifetime.cancel();
    }

    fn resolve(&self, result: Result<ProductsEnvelope, FetchError>) -> (ViewEvent, LoadOutcome) {
        let envelope = match result {
            Ok(envelope) => envelope,
            Err(error) => return self.failed(error),
        };
        if !envelope.success {
            warn!(event_name = "client.fetch.rejected", "service reported failure");
            let message = catalog_core::FETCH_REJECTED_MESSAGE.to_string();
            return (ViewEvent::FetchRejected, LoadOutcome::Failed { message });
        }

        match envelope.data {
            Some(products) => {
                if let Err(error) = CatalogSummary::of(&products) {
                    return self.failed(FetchError::Decode { message: error.to_string() });
                }
                debug!(
                    event_name = "client.fetch.succeeded",
                    product_count = products.len(),
                    "products loaded"
                );
                let count = products.len();
                (ViewEvent::FetchSucceeded(products), LoadOutcome::Loaded { count })
            }
            None => self.failed(FetchError::Decode {
                message: "response is missing product data".to_string(),
            }),
        }
    }

    fn failed(&self, error: FetchError) -> (ViewEvent, LoadOutcome) {
        let message = error.user_message(self.source.endpoint());
        warn!(event_name = "client.fetch.failed", error = %message, "fetch failed");
        (ViewEvent::FetchFailed(message.clone()), LoadOutcome::Failed { message })
    }

    fn transition(&self, event: ViewEvent) {
        self.state.send_if_modified(|state| {
            let event_name = event.name();
            match state.apply(event) {
                Ok(next) => {
                    let changed = *state != next;
                    *state = next;
                    changed
                }
                Err(error) => {
                    warn!(
                        event_name = "client.view.transition_rejected",
                        event = event_name,
                        error = %error,
                        "view transition rejected"
                    );
                    false
                }
            }
        });
    }
}

impl<S> Drop for CatalogSession<S> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
