//! crates/traveller_core/src/store/travel.rs
//!
//! Single-attempt travel operations: trip planning, translation and
//! transport routes. A failure is final for that user action.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{
    RouteQuery, Translation, TranslationRequest, TransportRoute, TripPlan, TripRequest,
};
use crate::notify::{Notifier, Operation};
use crate::ports::TravelGateway;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPlanState {
    pub loading: bool,
    pub plan: Option<TripPlan>,
    pub error: Option<String>,
}

pub struct TripPlanStore {
    gateway: Arc<dyn TravelGateway>,
    notifier: Notifier,
    state: RwLock<TripPlanState>,
}

impl TripPlanStore {
    pub fn new(gateway: Arc<dyn TravelGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            state: RwLock::new(TripPlanState::default()),
        }
    }

    pub async fn snapshot(&self) -> TripPlanState {
        self.state.read().await.clone()
    }

    /// Generates a day-by-day plan. A failed attempt keeps the previous plan
    /// and records the error next to it.
    pub async fn generate(&self, request: &TripRequest) -> bool {
        if request.days == 0
            || request.budget == 0
            || request.place.trim().is_empty()
            || request.activity.trim().is_empty()
        {
            self.notifier.error(Operation::GenerateTrip, "Please fill all fields");
            return false;
        }

        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }
        let pending = self
            .notifier
            .loading(Operation::GenerateTrip, "Crafting your trip plan...");
        let result = self.gateway.generate_trip(request).await;
        self.notifier.dismiss(pending);

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(plan) => {
                info!(place = %request.place, days = plan.len(), "Trip plan generated.");
                state.plan = Some(plan);
                self.notifier
                    .success(Operation::GenerateTrip, "Trip plan generated!");
                true
            }
            Err(e) => {
                warn!("Trip generation failed: {}", e);
                let message = e
                    .user_message()
                    .unwrap_or("Failed to generate trip plan")
                    .to_string();
                state.error = Some(message.clone());
                self.notifier.error(Operation::GenerateTrip, message);
                false
            }
        }
    }
}

/// Stateless request/response helpers; results go straight back to the caller.
pub struct TravelDesk {
    gateway: Arc<dyn TravelGateway>,
    notifier: Notifier,
}

impl TravelDesk {
    pub fn new(gateway: Arc<dyn TravelGateway>, notifier: Notifier) -> Self {
        Self { gateway, notifier }
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Option<Translation> {
        if request.source_text.trim().is_empty() {
            self.notifier
                .error(Operation::Translate, "Please enter text to translate");
            return None;
        }

        match self.gateway.translate(request).await {
            Ok(translation) => {
                self.notifier
                    .success(Operation::Translate, "Translation successful!");
                Some(translation)
            }
            Err(e) => {
                warn!("Translation failed: {}", e);
                self.notifier.error(
                    Operation::Translate,
                    e.user_message().unwrap_or("Translation failed"),
                );
                None
            }
        }
    }

    pub async fn transport_routes(&self, query: &RouteQuery) -> Option<Vec<TransportRoute>> {
        if query.source.trim().is_empty() || query.destination.trim().is_empty() {
            self.notifier
                .error(Operation::TransportRoutes, "Please fill in both locations");
            return None;
        }

        match self.gateway.transport_routes(query).await {
            Ok(routes) => {
                self.notifier
                    .success(Operation::TransportRoutes, "Routes fetched successfully!");
                Some(routes)
            }
            Err(e) => {
                warn!("Transport route lookup failed: {}", e);
                self.notifier.error(
                    Operation::TransportRoutes,
                    e.user_message().unwrap_or("Something went wrong"),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlertReport, DestinationSuggestion, SuggestionQuery, TripDay};
    use crate::notify::{NotificationEvent, NotificationKind};
    use crate::ports::{PortError, PortResult};
    use crate::testing::shown;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Desk {
        fail: AtomicBool,
        calls: AtomicUsize,
    }

    impl Desk {
        fn answer<T>(&self, value: T) -> PortResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(PortError::rejected("Missing required fields"))
            } else {
                Ok(value)
            }
        }
    }

    #[async_trait]
    impl TravelGateway for Desk {
        async fn location_alerts(&self, _location: &str) -> PortResult<AlertReport> {
            unreachable!("retried elsewhere")
        }

        async fn destination_suggestions(
            &self,
            _q: &SuggestionQuery,
        ) -> PortResult<Vec<DestinationSuggestion>> {
            unreachable!("retried elsewhere")
        }

        async fn generate_trip(&self, request: &TripRequest) -> PortResult<TripPlan> {
            let days = (0..request.days)
                .map(|_| TripDay {
                    places: request.place.clone(),
                    ..Default::default()
                })
                .collect();
            self.answer(days)
        }

        async fn translate(&self, request: &TranslationRequest) -> PortResult<Translation> {
            self.answer(Translation {
                translated_text: format!("[{}] {}", request.target_lang, request.source_text),
                source_lang: request.source_lang.clone(),
                target_lang: request.target_lang.clone(),
            })
        }

        async fn transport_routes(&self, _q: &RouteQuery) -> PortResult<Vec<TransportRoute>> {
            self.answer(vec![])
        }
    }

    fn trip() -> TripRequest {
        TripRequest {
            days: 3,
            budget: 15000,
            place: "Jaipur".into(),
            activity: "heritage".into(),
        }
    }

    #[tokio::test]
    async fn generated_plan_is_stored_and_loading_is_dismissed() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();
        let store = TripPlanStore::new(Arc::new(Desk::default()), notifier);

        assert!(store.generate(&trip()).await);

        let state = store.snapshot().await;
        assert!(!state.loading);
        assert_eq!(state.plan.unwrap().len(), 3);

        let first = rx.try_recv().unwrap();
        let NotificationEvent::Shown(loading) = first else {
            panic!("expected a loading notification");
        };
        assert_eq!(loading.kind, NotificationKind::Loading);
        assert_eq!(rx.try_recv().unwrap(), NotificationEvent::Dismissed(loading.id));
    }

    #[tokio::test]
    async fn failed_generation_keeps_previous_plan() {
        let gateway = Arc::new(Desk::default());
        let store = TripPlanStore::new(gateway.clone(), Notifier::default());
        store.generate(&trip()).await;

        gateway.fail.store(true, Ordering::SeqCst);
        assert!(!store.generate(&trip()).await);

        let state = store.snapshot().await;
        assert_eq!(state.plan.map(|p| p.len()), Some(3));
        assert_eq!(state.error.as_deref(), Some("Missing required fields"));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn translation_is_attempted_once() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();
        let gateway = Arc::new(Desk::default());
        gateway.fail.store(true, Ordering::SeqCst);
        let desk = TravelDesk::new(gateway.clone(), notifier);

        let request = TranslationRequest {
            source_text: "Where is the station?".into(),
            source_lang: "en".into(),
            target_lang: "hi".into(),
        };
        assert!(desk.translate(&request).await.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(shown(&mut rx)[0].message, "Missing required fields");
    }

    #[tokio::test]
    async fn blank_inputs_are_refused_locally() {
        let gateway = Arc::new(Desk::default());
        let desk = TravelDesk::new(gateway.clone(), Notifier::default());

        let routes = desk
            .transport_routes(&RouteQuery {
                source: "Andheri".into(),
                destination: " ".into(),
            })
            .await;
        assert!(routes.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }
}
