//! crates/traveller_core/src/store/session.rs
//!
//! The persisted session store: who is logged in, rehydrated from durable
//! storage at startup and written back on every mutation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{Coordinates, Credentials, LovedOne, Registration, Session, User};
use crate::notify::{Notifier, Operation};
use crate::ports::{AuthGateway, LocationError, LocationProvider, PortError, SessionStorage};
use crate::settings::StoreSettings;

/// Asks the provider for the current position, giving up after `limit`.
pub async fn acquire_position(
    provider: &dyn LocationProvider,
    limit: Duration,
) -> Result<Coordinates, LocationError> {
    tokio::time::timeout(limit, provider.current_position())
        .await
        .unwrap_or(Err(LocationError::Timeout))
}

pub struct SessionStore {
    gateway: Arc<dyn AuthGateway>,
    storage: Arc<dyn SessionStorage>,
    notifier: Notifier,
    storage_key: String,
    location_timeout: Duration,
    state: RwLock<Session>,
}

impl SessionStore {
    /// Builds the store from whatever session the storage holds under the
    /// configured key. Missing or unreadable data starts logged out.
    pub async fn rehydrate(
        gateway: Arc<dyn AuthGateway>,
        storage: Arc<dyn SessionStorage>,
        notifier: Notifier,
        settings: &StoreSettings,
    ) -> Self {
        let session = match storage.load(&settings.session_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => session.normalized(),
                Err(e) => {
                    warn!("Discarding unreadable persisted session: {}", e);
                    Session::logged_out()
                }
            },
            Ok(None) => Session::logged_out(),
            Err(e) => {
                warn!("Could not read persisted session: {}", e);
                Session::logged_out()
            }
        };
        info!(logged_in = session.logged_in, "Session store rehydrated.");

        Self {
            gateway,
            storage,
            notifier,
            storage_key: settings.session_key.clone(),
            location_timeout: settings.location_timeout,
            state: RwLock::new(session),
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn logged_in(&self) -> bool {
        self.state.read().await.logged_in
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    //=====================================================================================
    // Authentication
    //=====================================================================================

    pub async fn login(&self, credentials: &Credentials) -> bool {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            self.notifier
                .error(Operation::Login, "Please enter your email and password");
            return false;
        }

        match self.gateway.login(credentials).await {
            Ok(user) => {
                info!(user_id = user.id, "Login successful.");
                self.replace(Session::for_user(user)).await;
                self.notifier.success(Operation::Login, "Login successful!");
                true
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.notifier.error(
                    Operation::Login,
                    e.user_message().unwrap_or("Login failed. Please try again."),
                );
                false
            }
        }
    }

    /// Registers an account. When the gateway hands back the new user the
    /// session is started right away.
    pub async fn register(&self, registration: &Registration) -> bool {
        let missing = [
            &registration.name,
            &registration.email,
            &registration.phone,
            &registration.password,
        ]
        .iter()
        .any(|field| field.trim().is_empty());
        if missing {
            self.notifier
                .error(Operation::Register, "Please fill in all fields");
            return false;
        }

        let pending = self
            .notifier
            .loading(Operation::Register, "Creating your account...");
        let result = self.gateway.register(registration).await;
        self.notifier.dismiss(pending);

        match result {
            Ok(user) => {
                if let Some(user) = user {
                    info!(user_id = user.id, "Registration returned a user; starting session.");
                    self.replace(Session::for_user(user)).await;
                }
                self.notifier.success(
                    Operation::Register,
                    "Registration successful! Redirecting...",
                );
                true
            }
            Err(e) => {
                warn!("Registration failed: {}", e);
                self.notifier.error(
                    Operation::Register,
                    e.user_message()
                        .unwrap_or("Registration failed. Please try again."),
                );
                false
            }
        }
    }

    /// Clears the session. This never fails.
    pub async fn logout(&self) {
        self.replace(Session::logged_out()).await;
        self.notifier
            .success(Operation::Logout, "Logged out successfully");
    }

    //=====================================================================================
    // SOS
    //=====================================================================================

    /// Posts an SOS alert for `user_id`. The session itself is not touched.
    pub async fn send_sos_alert(&self, user_id: i64, coordinates: Coordinates) -> bool {
        match self.gateway.send_sos_alert(user_id, coordinates).await {
            Ok(receipt) => {
                info!(
                    user_id,
                    sent = receipt.successful_sends,
                    failed = receipt.failed_sends,
                    "SOS alert dispatched."
                );
                let message = if receipt.message.is_empty() {
                    "SOS alert sent successfully".to_string()
                } else {
                    receipt.message
                };
                self.notifier.success(Operation::SendSos, message);
                true
            }
            Err(e) => {
                warn!(user_id, "SOS alert failed: {}", e);
                self.notifier.error(
                    Operation::SendSos,
                    e.user_message().unwrap_or("Failed to send SOS alert"),
                );
                false
            }
        }
    }

    /// Locates the device and sends an SOS alert for the logged-in user.
    pub async fn send_sos_from_device(&self, provider: &dyn LocationProvider) -> bool {
        let Some(user_id) = self.state.read().await.user.as_ref().map(|u| u.id) else {
            self.notifier
                .error(Operation::SendSos, "Please log in to send SOS alerts");
            return false;
        };

        let coordinates = match acquire_position(provider, self.location_timeout).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                warn!(user_id, "Could not acquire device position: {}", e);
                self.notifier.error(Operation::SendSos, e.to_string());
                return false;
            }
        };

        self.send_sos_alert(user_id, coordinates).await
    }

    //=====================================================================================
    // Loved ones
    //=====================================================================================

    pub async fn refresh_loved_ones(&self) -> bool {
        let Some(user_id) = self.current_user_id(Operation::LovedOnes).await else {
            return false;
        };

        match self.gateway.loved_ones(user_id).await {
            Ok(loved_ones) => {
                self.set_loved_ones(user_id, loved_ones).await;
                true
            }
            Err(e) => {
                warn!(user_id, "Failed to load loved ones: {}", e);
                self.notifier.error(
                    Operation::LovedOnes,
                    e.user_message().unwrap_or("Failed to load loved ones"),
                );
                false
            }
        }
    }

    pub async fn add_loved_one(&self, loved_one: &LovedOne) -> bool {
        if loved_one.name.trim().is_empty() || loved_one.email.trim().is_empty() {
            self.notifier
                .error(Operation::LovedOnes, "Please enter a name and email");
            return false;
        }
        let Some(user_id) = self.current_user_id(Operation::LovedOnes).await else {
            return false;
        };

        match self.gateway.add_loved_one(user_id, loved_one).await {
            Ok(loved_ones) => {
                self.set_loved_ones(user_id, loved_ones).await;
                self.notifier
                    .success(Operation::LovedOnes, "Loved one added successfully");
                true
            }
            Err(e) => {
                warn!(user_id, "Failed to add loved one: {}", e);
                self.notifier.error(
                    Operation::LovedOnes,
                    e.user_message().unwrap_or("Failed to add loved one"),
                );
                false
            }
        }
    }

    //=====================================================================================
    // Persistence
    //=====================================================================================

    /// Writes the current session to storage once more. Used at shutdown.
    pub async fn flush(&self) {
        let state = self.state.read().await;
        self.persist(&state).await;
    }

    async fn current_user_id(&self, operation: Operation) -> Option<i64> {
        let user_id = self.state.read().await.user.as_ref().map(|u| u.id);
        if user_id.is_none() {
            self.notifier.error(operation, "Please log in first");
        }
        user_id
    }

    async fn set_loved_ones(&self, user_id: i64, loved_ones: Vec<LovedOne>) {
        let mut state = self.state.write().await;
        match state.user.as_mut() {
            Some(user) if user.id == user_id => user.loved_ones = loved_ones,
            _ => {
                debug!(user_id, "Session changed while loved ones were loading; discarding.");
                return;
            }
        }
        self.persist(&state).await;
    }

    async fn replace(&self, session: Session) {
        let mut state = self.state.write().await;
        *state = session;
        self.persist(&state).await;
    }

    /// The write lock is held by the caller, so storage sees writes in order.
    async fn persist(&self, session: &Session) {
        let result = if session.logged_in {
            match serde_json::to_string(session) {
                Ok(raw) => self.storage.save(&self.storage_key, &raw).await,
                Err(e) => Err(PortError::Unexpected(e.to_string())),
            }
        } else {
            self.storage.remove(&self.storage_key).await
        };
        if let Err(e) = result {
            warn!("Failed to persist session: {}", e);
        }
    }
}
