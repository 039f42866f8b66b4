//! crates/traveller_core/src/app.rs
//!
//! The application container. It is built once at startup, handed by
//! reference to whatever needs a store, and torn down explicitly.

use std::sync::Arc;

use tracing::info;

use crate::notify::Notifier;
use crate::ports::{AuthGateway, LostFoundGateway, SessionStorage, TravelGateway};
use crate::settings::StoreSettings;
use crate::store::{
    AlertsStore, LostFoundStore, SessionStore, SuggestionsStore, TravelDesk, TripPlanStore,
};

pub struct AppContext {
    pub notifier: Notifier,
    pub session: Arc<SessionStore>,
    pub lost_found: Arc<LostFoundStore>,
    pub alerts: Arc<AlertsStore>,
    pub suggestions: Arc<SuggestionsStore>,
    pub trips: Arc<TripPlanStore>,
    pub desk: Arc<TravelDesk>,
}

impl AppContext {
    /// Rehydrates the session and builds every store over one gateway.
    pub async fn init<G>(
        gateway: Arc<G>,
        storage: Arc<dyn SessionStorage>,
        notifier: Notifier,
        settings: &StoreSettings,
    ) -> Self
    where
        G: AuthGateway + LostFoundGateway + TravelGateway + 'static,
    {
        let session =
            SessionStore::rehydrate(gateway.clone(), storage, notifier.clone(), settings).await;
        let lost_found = LostFoundStore::new(gateway.clone(), notifier.clone());
        let alerts = AlertsStore::new(
            gateway.clone(),
            notifier.clone(),
            settings.retry,
            settings.alerts_fallback,
        );
        let suggestions = SuggestionsStore::new(gateway.clone(), notifier.clone(), settings.retry);
        let trips = TripPlanStore::new(gateway.clone(), notifier.clone());
        let desk = TravelDesk::new(gateway, notifier.clone());
        info!("Application context initialised.");

        Self {
            notifier,
            session: Arc::new(session),
            lost_found: Arc::new(lost_found),
            alerts: Arc::new(alerts),
            suggestions: Arc::new(suggestions),
            trips: Arc::new(trips),
            desk: Arc::new(desk),
        }
    }

    /// Persists the session one last time and drops every store. Once no
    /// other handles remain the notification channel closes.
    pub async fn shutdown(self) {
        self.session.flush().await;
        info!("Application context shut down.");
    }
}
