//! services/gateway/src/web/rest.rs
//!
//! Assembles the mock gateway's router and the master definition for the
//! OpenAPI specification.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;

use crate::web::auth::*;
use crate::web::lost_found::*;
use crate::web::safety::*;
use crate::web::state::AppState;
use crate::web::travel::*;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        register_handler,
        login_handler,
        list_items_handler,
        add_item_handler,
        update_item_handler,
        delete_item_handler,
        loved_ones_handler,
        add_loved_one_handler,
        send_sos_handler,
        location_alerts_handler,
        generate_trip_handler,
        transport_routes_handler,
        travel_suggestions_handler,
        translate_handler,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AddItemRequest,
            UpdateItemRequest,
            DeleteItemRequest,
            LovedOneRequest,
            SosRequest,
            GenerateTripRequest,
            RoutesRequest,
            SuggestionsRequest,
            TranslateRequest,
        )
    ),
    tags(
        (name = "Traveller Gateway", description = "In-memory mock of the travel-safety backend.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Builds the complete route table over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/register/", post(register_handler))
        .route("/api/login/", post(login_handler))
        .route("/api/lost-found-items/", get(list_items_handler))
        .route("/api/add-lost-found-item/", post(add_item_handler))
        .route("/api/update-lost-found-item/", post(update_item_handler))
        .route("/api/delete-lost-found-item/", post(delete_item_handler))
        .route("/api/loved_ones/{user_id}/", get(loved_ones_handler))
        .route("/api/add_loved_one/{user_id}/", post(add_loved_one_handler))
        .route("/api/send-sos-alert/{user_id}/", post(send_sos_handler))
        .route("/api/alerts/location/", get(location_alerts_handler))
        .route("/api/generate-trip/", post(generate_trip_handler))
        .route("/api/transport-routes/", post(transport_routes_handler))
        .route("/travel-suggestions/", post(travel_suggestions_handler))
        .route("/api/translate/", post(translate_handler))
        .with_state(state)
}
