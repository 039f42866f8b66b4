//! crates/traveller_core/src/store/query.rs
//!
//! Retry-wrapped read queries: location alerts and destination suggestions.
//! Each query is attempted a bounded number of times with a fixed pause in
//! between, and publishes exactly one terminal notification.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{AlertBoard, DestinationSuggestion, SuggestionQuery};
use crate::notify::{Notifier, Operation};
use crate::ports::{PortResult, TravelGateway};
use crate::settings::{AlertsFallback, RetryPolicy};

const ALERTS_FAILED: &str = "Failed to fetch alerts. Please try again later.";

/// Runs `call` until it succeeds or `policy.max_attempts` is reached,
/// sleeping `policy.delay` after every failed attempt except the last.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: Operation,
    mut call: F,
) -> PortResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PortResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(
                    ?operation,
                    attempt,
                    "Attempt failed: {}. Retrying in {:?}.",
                    e,
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(?operation, attempt, "All attempts failed: {}", e);
                return Err(e);
            }
        }
    }
}

/// The state a query leaves behind. Each successful or exhausted query
/// replaces the previous outcome wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    /// The gateway answered.
    Fresh(T),
    /// Retries ran out and a built-in value stands in for the answer.
    Fallback(T),
    /// Retries ran out and there is nothing to show.
    Empty,
    /// Retries ran out and the view should show this error.
    Failed(String),
}

struct Slot<T> {
    issued: u64,
    settled: u64,
    outcome: Option<QueryOutcome<T>>,
}

/// Holds the latest outcome. Every query takes a generation number when it
/// starts; only the newest generation may write its result.
struct QueryCell<T> {
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> QueryCell<T> {
    fn new() -> Self {
        Self {
            slot: RwLock::new(Slot {
                issued: 0,
                settled: 0,
                outcome: None,
            }),
        }
    }

    async fn begin(&self) -> u64 {
        let mut slot = self.slot.write().await;
        slot.issued += 1;
        slot.issued
    }

    /// Returns false when a newer query has started since `generation`.
    async fn finish(&self, generation: u64, outcome: QueryOutcome<T>) -> bool {
        let mut slot = self.slot.write().await;
        if slot.issued != generation {
            debug!(generation, latest = slot.issued, "Discarding superseded query result.");
            return false;
        }
        slot.settled = generation;
        slot.outcome = Some(outcome);
        true
    }

    async fn outcome(&self) -> Option<QueryOutcome<T>> {
        self.slot.read().await.outcome.clone()
    }

    async fn loading(&self) -> bool {
        let slot = self.slot.read().await;
        slot.issued != slot.settled
    }
}

//=========================================================================================
// Alerts
//=========================================================================================

pub struct AlertsStore {
    gateway: Arc<dyn TravelGateway>,
    notifier: Notifier,
    retry: RetryPolicy,
    fallback: AlertsFallback,
    cell: QueryCell<AlertBoard>,
}

impl AlertsStore {
    pub fn new(
        gateway: Arc<dyn TravelGateway>,
        notifier: Notifier,
        retry: RetryPolicy,
        fallback: AlertsFallback,
    ) -> Self {
        Self {
            gateway,
            notifier,
            retry,
            fallback,
            cell: QueryCell::new(),
        }
    }

    pub async fn outcome(&self) -> Option<QueryOutcome<AlertBoard>> {
        self.cell.outcome().await
    }

    pub async fn loading(&self) -> bool {
        self.cell.loading().await
    }

    /// Fetches alerts for `location`. Returns true when fresh alerts were
    /// installed; a query overtaken by a newer one returns false and leaves
    /// no trace.
    pub async fn query(&self, location: &str) -> bool {
        let location = location.trim();
        if location.is_empty() {
            self.notifier.error(Operation::Alerts, "Please enter a location");
            return false;
        }

        let generation = self.cell.begin().await;
        let gateway = self.gateway.as_ref();
        let result = with_retry(&self.retry, Operation::Alerts, move || {
            gateway.location_alerts(location)
        })
        .await;

        match result {
            Ok(report) => {
                let board = AlertBoard::from_report(report, location);
                if !self.cell.finish(generation, QueryOutcome::Fresh(board)).await {
                    return false;
                }
                info!(location, "Alerts updated.");
                self.notifier
                    .success(Operation::Alerts, format!("Alerts updated for {}", location));
                true
            }
            Err(_) => {
                let outcome = match self.fallback {
                    AlertsFallback::Defaults => QueryOutcome::Fallback(AlertBoard::sample()),
                    AlertsFallback::Surface => QueryOutcome::Failed(ALERTS_FAILED.to_string()),
                };
                if self.cell.finish(generation, outcome).await {
                    self.notifier.error(Operation::Alerts, ALERTS_FAILED);
                }
                false
            }
        }
    }
}

//=========================================================================================
// Destination suggestions
//=========================================================================================

pub struct SuggestionsStore {
    gateway: Arc<dyn TravelGateway>,
    notifier: Notifier,
    retry: RetryPolicy,
    cell: QueryCell<Vec<DestinationSuggestion>>,
}

impl SuggestionsStore {
    pub fn new(gateway: Arc<dyn TravelGateway>, notifier: Notifier, retry: RetryPolicy) -> Self {
        Self {
            gateway,
            notifier,
            retry,
            cell: QueryCell::new(),
        }
    }

    pub async fn outcome(&self) -> Option<QueryOutcome<Vec<DestinationSuggestion>>> {
        self.cell.outcome().await
    }

    pub async fn loading(&self) -> bool {
        self.cell.loading().await
    }

    pub async fn query(&self, query: &SuggestionQuery) -> bool {
        if query.interests.trim().is_empty() {
            self.notifier
                .error(Operation::Suggestions, "Please specify your interests");
            return false;
        }

        let generation = self.cell.begin().await;
        let gateway = self.gateway.as_ref();
        let result = with_retry(&self.retry, Operation::Suggestions, move || {
            gateway.destination_suggestions(query)
        })
        .await;

        match result {
            Ok(suggestions) => {
                if !self.cell.finish(generation, QueryOutcome::Fresh(suggestions)).await {
                    return false;
                }
                self.notifier
                    .success(Operation::Suggestions, "Destinations found successfully!");
                true
            }
            Err(e) => {
                if self.cell.finish(generation, QueryOutcome::Empty).await {
                    self.notifier.error(
                        Operation::Suggestions,
                        e.user_message().unwrap_or("Failed to find destinations"),
                    );
                }
                false
            }
        }
    }
}
