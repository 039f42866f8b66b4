//! services/gateway/src/web/safety.rs
//!
//! Emergency contacts, SOS dispatch and location safety alerts.
//! Nothing leaves the process: "sending" an SOS alert is a log line per contact.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use traveller_core::domain::{AlertReport, LovedOne, SafetyAnalysis};
use utoipa::{IntoParams, ToSchema};

use crate::web::reply::{failure, success, Reply};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct LovedOneRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SosRequest {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertsQuery {
    #[serde(default)]
    pub location: String,
}

//=========================================================================================
// Emergency contacts
//=========================================================================================

/// GET /api/loved_ones/{user_id}/ - List a user's emergency contacts
#[utoipa::path(
    get,
    path = "/api/loved_ones/{user_id}/",
    params(("user_id" = i64, Path, description = "The user's id.")),
    responses(
        (status = 200, description = "The user's emergency contacts"),
        (status = 404, description = "User not found")
    )
)]
pub async fn loved_ones_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Reply {
    let directory = state.directory.lock().await;
    let account = directory
        .account(user_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;
    success(json!({ "loved_ones": account.user.loved_ones }))
}

/// POST /api/add_loved_one/{user_id}/ - Add an emergency contact
#[utoipa::path(
    post,
    path = "/api/add_loved_one/{user_id}/",
    params(("user_id" = i64, Path, description = "The user's id.")),
    request_body = LovedOneRequest,
    responses(
        (status = 200, description = "Contact added; the full list is returned"),
        (status = 404, description = "User not found")
    )
)]
pub async fn add_loved_one_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<LovedOneRequest>,
) -> Reply {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Name and email are required"));
    }

    let mut directory = state.directory.lock().await;
    let account = directory
        .account_mut(user_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;
    account.user.loved_ones.push(LovedOne {
        name: req.name,
        email: req.email,
    });

    success(json!({
        "message": "Loved one added successfully",
        "loved_ones": account.user.loved_ones,
    }))
}

//=========================================================================================
// SOS
//=========================================================================================

/// POST /api/send-sos-alert/{user_id}/ - Alert every emergency contact
#[utoipa::path(
    post,
    path = "/api/send-sos-alert/{user_id}/",
    params(("user_id" = i64, Path, description = "The user's id.")),
    request_body = SosRequest,
    responses(
        (status = 200, description = "Alerts dispatched, with per-contact counts"),
        (status = 400, description = "No emergency contacts or missing coordinates"),
        (status = 404, description = "User not found")
    )
)]
pub async fn send_sos_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<SosRequest>,
) -> Reply {
    let directory = state.directory.lock().await;
    let account = directory
        .account(user_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;

    let contacts = &account.user.loved_ones;
    if contacts.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "No emergency contacts found. Please add emergency contacts first.",
        ));
    }
    let (Some(latitude), Some(longitude)) = (req.latitude, req.longitude) else {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Location coordinates are required",
        ));
    };

    let maps_link = format!("https://www.google.com/maps?q={},{}", latitude, longitude);
    for contact in contacts {
        warn!(
            from = %account.user.name,
            to = %contact.email,
            %maps_link,
            "EMERGENCY SOS alert dispatched."
        );
    }

    success(json!({
        "message": format!("SOS alerts sent successfully to {} contacts", contacts.len()),
        "total_contacts": contacts.len(),
        "successful_sends": contacts.len(),
        "failed_sends": 0,
    }))
}

//=========================================================================================
// Location alerts
//=========================================================================================

/// GET /api/alerts/location/?location= - Safety analysis for a place
#[utoipa::path(
    get,
    path = "/api/alerts/location/",
    params(AlertsQuery),
    responses(
        (status = 200, description = "News headlines and a safety analysis"),
        (status = 400, description = "Location is required")
    )
)]
pub async fn location_alerts_handler(Query(query): Query<AlertsQuery>) -> Reply {
    let location = query.location.trim();
    if location.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Location is required"));
    }

    info!(location, "Serving canned safety analysis.");
    let report = AlertReport {
        location: location.to_string(),
        news: Vec::new(),
        analysis: SafetyAnalysis {
            analysis: format!("Analysis currently unavailable for {}.", location),
            alerts: vec!["No specific alerts at this time.".to_string()],
            precautions: vec!["Stay updated with local news.".to_string()],
        },
    };
    success(json!(report))
}
