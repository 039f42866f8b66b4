pub mod app;
pub mod domain;
pub mod notify;
pub mod ports;
pub mod settings;
pub mod store;

mod memory;
pub use memory::{MemoryStorage, StaticLocation};

#[cfg(test)]
mod testing;

pub use app::AppContext;
pub use notify::{Notification, NotificationEvent, NotificationKind, Notifier, Operation};
pub use ports::{
    AuthGateway, LocationError, LocationProvider, LostFoundGateway, PortError, PortResult,
    SessionStorage, TravelGateway,
};
pub use settings::{AlertsFallback, RetryPolicy, StoreSettings, SESSION_STORAGE_KEY};
