//! crates/traveller_core/src/ports.rs
//!
//! Defines the service contracts (traits) the stores depend on.
//! The gateway, durable storage and device location are all reached through
//! these traits, so the stores never know about HTTP, files or sensors.

use async_trait::async_trait;

use crate::domain::{
    AlertReport, Coordinates, Credentials, DestinationSuggestion, ItemStatus, LostFoundItem,
    LovedOne, NewLostFoundItem, Registration, RouteQuery, SosReceipt, SuggestionQuery,
    Translation, TranslationRequest, TransportRoute, TripPlan, TripRequest, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// No response was received from the gateway.
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The gateway answered with `status != "success"`.
    #[error("Rejected by gateway: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },
    /// A client-side check failed before anything was sent.
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    pub fn rejected(message: impl Into<String>) -> Self {
        PortError::Rejected {
            message: Some(message.into()),
        }
    }

    /// The text meant for the user, if the failure carries one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            PortError::Rejected { message } => message.as_deref(),
            PortError::Precondition(message) => Some(message),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Failures of the device-location acquisition path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Please allow location access to send SOS alerts")]
    PermissionDenied,
    #[error("Location information is unavailable")]
    Unavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation is not supported by your browser")]
    Unsupported,
}

//=========================================================================================
// Gateway Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> PortResult<User>;

    /// Registers an account. The gateway may or may not return the new user.
    async fn register(&self, registration: &Registration) -> PortResult<Option<User>>;

    async fn send_sos_alert(&self, user_id: i64, coordinates: Coordinates)
        -> PortResult<SosReceipt>;

    async fn loved_ones(&self, user_id: i64) -> PortResult<Vec<LovedOne>>;

    /// Adds a contact and returns the user's full, updated contact list.
    async fn add_loved_one(&self, user_id: i64, loved_one: &LovedOne)
        -> PortResult<Vec<LovedOne>>;
}

#[async_trait]
pub trait LostFoundGateway: Send + Sync {
    async fn list_items(&self) -> PortResult<Vec<LostFoundItem>>;

    /// Creates a record and returns the canonical copy carrying its `report_id`.
    async fn add_item(&self, item: &NewLostFoundItem) -> PortResult<LostFoundItem>;

    async fn update_item_status(&self, report_id: i64, status: ItemStatus) -> PortResult<()>;

    async fn delete_item(&self, report_id: i64) -> PortResult<()>;
}

#[async_trait]
pub trait TravelGateway: Send + Sync {
    async fn location_alerts(&self, location: &str) -> PortResult<AlertReport>;

    async fn destination_suggestions(
        &self,
        query: &SuggestionQuery,
    ) -> PortResult<Vec<DestinationSuggestion>>;

    async fn generate_trip(&self, request: &TripRequest) -> PortResult<TripPlan>;

    async fn translate(&self, request: &TranslationRequest) -> PortResult<Translation>;

    async fn transport_routes(&self, query: &RouteQuery) -> PortResult<Vec<TransportRoute>>;
}

//=========================================================================================
// Device Ports (Traits)
//=========================================================================================

/// Durable string key/value storage that survives restarts.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self, key: &str) -> PortResult<Option<String>>;

    async fn save(&self, key: &str, value: &str) -> PortResult<()>;

    async fn remove(&self, key: &str) -> PortResult<()>;
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}
