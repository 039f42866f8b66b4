//! services/gateway/src/web/lost_found.rs
//!
//! Lost & found report endpoints. Reports get sequential ids.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use traveller_core::domain::{ItemStatus, LostFoundItem};
use utoipa::ToSchema;

use crate::web::reply::{failure, success, Reply};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub user_id: i64,
    pub location: String,
    pub item_description: String,
    #[schema(value_type = String, example = "Lost")]
    pub status: ItemStatus,
    #[serde(default)]
    pub date_found: Option<DateTime<Utc>>,
}

/// Absent fields keep their current value.
#[derive(Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub report_id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub item_description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub date_found: Option<DateTime<Utc>>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteItemRequest {
    pub report_id: i64,
}

/// GET /api/lost-found-items/ - List every report
#[utoipa::path(
    get,
    path = "/api/lost-found-items/",
    responses((status = 200, description = "All reports, in creation order"))
)]
pub async fn list_items_handler(State(state): State<Arc<AppState>>) -> Reply {
    let directory = state.directory.lock().await;
    success(json!({ "items": directory.items() }))
}

/// POST /api/add-lost-found-item/ - File a new report
#[utoipa::path(
    post,
    path = "/api/add-lost-found-item/",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Report created, returned under `data`"),
        (status = 404, description = "User not found")
    )
)]
pub async fn add_item_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddItemRequest>,
) -> Reply {
    let mut directory = state.directory.lock().await;
    if directory.account(req.user_id).is_none() {
        return Err(failure(StatusCode::NOT_FOUND, "User not found"));
    }

    let created = directory.insert_item(LostFoundItem {
        report_id: 0,
        user_id: req.user_id,
        location: req.location,
        item_description: req.item_description,
        status: req.status,
        report_date: None,
        date_found: req.date_found,
    });
    info!(report_id = created.report_id, status = %created.status, "Report filed.");
    success(json!({ "data": created }))
}

/// POST /api/update-lost-found-item/ - Patch a report
#[utoipa::path(
    post,
    path = "/api/update-lost-found-item/",
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Report updated"),
        (status = 404, description = "Lost and found item not found")
    )
)]
pub async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateItemRequest>,
) -> Reply {
    let mut directory = state.directory.lock().await;
    let item = directory
        .item_mut(req.report_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Lost and found item not found"))?;

    if let Some(location) = req.location {
        item.location = location;
    }
    if let Some(description) = req.item_description {
        item.item_description = description;
    }
    if let Some(status) = req.status {
        item.status = status;
    }
    if req.date_found.is_some() {
        item.date_found = req.date_found;
    }

    success(json!({
        "message": "Lost and found item updated successfully",
        "data": item,
    }))
}

/// POST /api/delete-lost-found-item/ - Remove a report
#[utoipa::path(
    post,
    path = "/api/delete-lost-found-item/",
    request_body = DeleteItemRequest,
    responses(
        (status = 200, description = "Report deleted"),
        (status = 404, description = "Lost and found item not found")
    )
)]
pub async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteItemRequest>,
) -> Reply {
    if !state.directory.lock().await.remove_item(req.report_id) {
        return Err(failure(StatusCode::NOT_FOUND, "Lost and found item not found"));
    }
    success(json!({ "message": "Lost and found item deleted successfully" }))
}
