//! services/gateway/src/client.rs
//!
//! Wires the client stores to a real gateway: `HttpGateway` for the network
//! side and `FileStorage` for the persisted session.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use traveller_core::notify::spawn_tracing_renderer;
use traveller_core::{AppContext, Notifier};

use crate::adapters::{FileStorage, HttpGateway};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Per-request ceiling; retries are layered on top by the stores.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds an `AppContext` against the configured gateway, rehydrating any
/// session left in the session directory. Notifications are rendered as
/// log lines.
pub async fn connect(config: &ClientConfig) -> Result<AppContext, ApiError> {
    let notifier = Notifier::default();
    spawn_tracing_renderer(&notifier);
    connect_with(config, notifier).await
}

/// Like [`connect`], but publishes on an existing notification channel.
pub async fn connect_with(
    config: &ClientConfig,
    notifier: Notifier,
) -> Result<AppContext, ApiError> {
    let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let gateway = Arc::new(HttpGateway::new(http, config.gateway_url.clone()));
    let storage = Arc::new(FileStorage::open(config.session_dir.clone()).await?);

    info!(
        gateway = %config.gateway_url,
        session_dir = %config.session_dir.display(),
        "Connecting client stores."
    );
    Ok(AppContext::init(gateway, storage, notifier, &config.store).await)
}
