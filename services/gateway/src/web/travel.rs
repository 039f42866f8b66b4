//! services/gateway/src/web/travel.rs
//!
//! Canned travel-planning endpoints: trip plans, transport routes,
//! destination suggestions and translation.

use axum::{http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use traveller_core::domain::{DestinationSuggestion, TransportRoute, TripDay};
use utoipa::ToSchema;

use crate::web::reply::{failure, success, Reply};

#[derive(Deserialize, ToSchema)]
pub struct GenerateTripRequest {
    pub days: u32,
    pub budget: u64,
    pub place: String,
    pub activity: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RoutesRequest {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub travelers: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub source_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// POST /api/generate-trip/ - Day-by-day trip plan
///
/// The plan is returned as a JSON document inside a string, the way a
/// language-model backend hands it over.
#[utoipa::path(
    post,
    path = "/api/generate-trip/",
    request_body = GenerateTripRequest,
    responses(
        (status = 200, description = "`trip_plan` holds a JSON array, one entry per day"),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn generate_trip_handler(Json(req): Json<GenerateTripRequest>) -> Reply {
    if req.days == 0 || req.place.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Days and place are required"));
    }

    let per_day = req.budget / u64::from(req.days);
    let plan: Vec<TripDay> = (1..=req.days)
        .map(|day| TripDay {
            places: format!("{} old town, day {}", req.place, day),
            food: format!("Local thali near {}", req.place),
            activities: req.activity.clone(),
            budget: format!("{} INR", per_day),
        })
        .collect();
    let encoded = serde_json::to_string(&plan).map_err(|e| {
        failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    success(json!({ "trip_plan": encoded }))
}

/// POST /api/transport-routes/ - Route options between two places
#[utoipa::path(
    post,
    path = "/api/transport-routes/",
    request_body = RoutesRequest,
    responses(
        (status = 200, description = "Three route options"),
        (status = 400, description = "Source and destination are required")
    )
)]
pub async fn transport_routes_handler(Json(req): Json<RoutesRequest>) -> Reply {
    if req.source.trim().is_empty() || req.destination.trim().is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Source and destination are required",
        ));
    }

    let route = |duration: &str, cost: &str, crowd: &str, via: &str| TransportRoute {
        duration: duration.to_string(),
        cost: cost.to_string(),
        crowd_level: crowd.to_string(),
        description: format!("{} to {} by {}", req.source, req.destination, via),
    };
    let routes = vec![
        route("45 mins", "₹40", "high", "metro"),
        route("1 hr 10 mins", "₹25", "medium", "city bus"),
        route("35 mins", "₹320", "low", "taxi"),
    ];
    success(json!({ "routes": routes }))
}

/// POST /travel-suggestions/ - Destinations matching the traveller's interests
#[utoipa::path(
    post,
    path = "/travel-suggestions/",
    request_body = SuggestionsRequest,
    responses(
        (status = 200, description = "Suggested destinations"),
        (status = 400, description = "Failed to generate suggestions")
    )
)]
pub async fn travel_suggestions_handler(Json(req): Json<SuggestionsRequest>) -> Reply {
    if req.interests.trim().is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Failed to generate suggestions",
        ));
    }

    let suggestions = vec![
        DestinationSuggestion {
            name: "Rishikesh".to_string(),
            description: format!("A riverside town for {}.", req.interests),
            highlights: "Laxman Jhula, Ganga Aarti".to_string(),
            cost_range: "₹8,000 - ₹15,000".to_string(),
            best_time: "September to November".to_string(),
            activities: vec!["Rafting".to_string(), "Yoga".to_string()],
        },
        DestinationSuggestion {
            name: "Hampi".to_string(),
            description: format!("Ruins and boulders for {}.", req.interests),
            highlights: "Virupaksha Temple, Vittala Temple".to_string(),
            cost_range: "₹6,000 - ₹12,000".to_string(),
            best_time: "October to February".to_string(),
            activities: vec!["Bouldering".to_string(), "Cycling".to_string()],
        },
    ];
    success(json!({ "suggestions": suggestions }))
}

/// POST /api/translate/ - Translate a phrase
#[utoipa::path(
    post,
    path = "/api/translate/",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text"),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn translate_handler(Json(req): Json<TranslateRequest>) -> Reply {
    if req.source_text.trim().is_empty() || req.target_lang.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Missing required fields"));
    }

    success(json!({
        "translatedText": format!("[{}] {}", req.target_lang, req.source_text.trim()),
        "sourceLang": req.source_lang,
        "targetLang": req.target_lang,
    }))
}
