//! services/gateway/src/adapters/http.rs
//!
//! This module contains the HTTP adapter for the backend's REST endpoints.
//! It implements the `AuthGateway`, `LostFoundGateway` and `TravelGateway`
//! ports from the `core` crate on top of `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use traveller_core::domain::{
    AlertReport, Coordinates, Credentials, DestinationSuggestion, ItemStatus, LostFoundItem,
    LovedOne, NewLostFoundItem, Registration, RouteQuery, SosReceipt, SuggestionQuery,
    Translation, TranslationRequest, TransportRoute, TripPlan, TripRequest, User,
};
use traveller_core::ports::{AuthGateway, LostFoundGateway, PortError, PortResult, TravelGateway};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that talks to the gateway's REST endpoints.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a new `HttpGateway`. Requests rely on the client's own timeouts.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and unwraps the `{status, message, ...}` envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        let http_status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let value: Value = match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(_) if !http_status.is_success() => {
                return Err(PortError::Rejected { message: None });
            }
            Err(e) => {
                return Err(PortError::Unexpected(format!(
                    "Gateway returned a non-JSON body: {}",
                    e
                )))
            }
        };

        if let Some(message) = rejection(&value, http_status.is_success()) {
            debug!(%http_status, "Gateway rejected the request.");
            return Err(PortError::Rejected { message });
        }

        serde_json::from_value(value)
            .map_err(|e| PortError::Unexpected(format!("Unexpected gateway payload: {}", e)))
    }
}

/// Returns `Some(message)` when the body or the HTTP status reports failure.
/// Both the `status: "success"` and the `success: true` conventions occur.
fn rejection(value: &Value, http_ok: bool) -> Option<Option<String>> {
    let message = || value.get("message").and_then(Value::as_str).map(str::to_string);
    let failed_status = value
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status != "success");
    let failed_flag = value.get("success").and_then(Value::as_bool) == Some(false);

    if failed_status || failed_flag || !http_ok {
        Some(message())
    } else {
        None
    }
}

//=========================================================================================
// Response Payloads
//=========================================================================================

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
}

#[derive(Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    user: Option<User>,
}

#[derive(Deserialize)]
struct LovedOnesResponse {
    #[serde(default, alias = "lovedOnes")]
    loved_ones: Option<Vec<LovedOne>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemList {
    Wrapped { items: Vec<LostFoundItem> },
    Bare(Vec<LostFoundItem>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CreatedItem {
    Wrapped { data: LostFoundItem },
    Bare(LostFoundItem),
}

#[derive(Deserialize)]
struct TripResponse {
    trip_plan: Value,
}

#[derive(Deserialize)]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<TransportRoute>,
}

#[derive(Deserialize)]
struct SuggestionsResponse {
    #[serde(default)]
    suggestions: Vec<DestinationSuggestion>,
}

/// The trip plan arrives either as JSON or as a JSON document inside a
/// string, sometimes wrapped in a Markdown code fence.
fn decode_trip_plan(raw: Value) -> PortResult<TripPlan> {
    let decoded = match raw {
        Value::String(text) => {
            let text = text.trim();
            let text = text
                .strip_prefix("```json")
                .and_then(|rest| rest.strip_suffix("```"))
                .unwrap_or(text);
            serde_json::from_str(text.trim())
        }
        other => serde_json::from_value(other),
    };
    decoded.map_err(|e| PortError::Unexpected(format!("Unreadable trip plan: {}", e)))
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> PortResult<User> {
        let request = self.client.post(self.url("/api/login/")).json(credentials);
        let response: LoginResponse = self.send(request).await?;
        Ok(response.user)
    }

    async fn register(&self, registration: &Registration) -> PortResult<Option<User>> {
        let request = self.client.post(self.url("/api/register/")).json(registration);
        let response: RegisterResponse = self.send(request).await?;
        Ok(response.user)
    }

    async fn send_sos_alert(
        &self,
        user_id: i64,
        coordinates: Coordinates,
    ) -> PortResult<SosReceipt> {
        let request = self
            .client
            .post(self.url(&format!("/api/send-sos-alert/{}/", user_id)))
            .json(&coordinates);
        self.send(request).await
    }

    async fn loved_ones(&self, user_id: i64) -> PortResult<Vec<LovedOne>> {
        let request = self.client.get(self.url(&format!("/api/loved_ones/{}/", user_id)));
        let response: LovedOnesResponse = self.send(request).await?;
        Ok(response.loved_ones.unwrap_or_default())
    }

    async fn add_loved_one(
        &self,
        user_id: i64,
        loved_one: &LovedOne,
    ) -> PortResult<Vec<LovedOne>> {
        let request = self
            .client
            .post(self.url(&format!("/api/add_loved_one/{}/", user_id)))
            .json(loved_one);
        let response: LovedOnesResponse = self.send(request).await?;
        match response.loved_ones {
            Some(list) => Ok(list),
            // Older gateways only acknowledge; ask for the list instead.
            None => self.loved_ones(user_id).await,
        }
    }
}

#[async_trait]
impl LostFoundGateway for HttpGateway {
    async fn list_items(&self) -> PortResult<Vec<LostFoundItem>> {
        let request = self.client.get(self.url("/api/lost-found-items/"));
        match self.send::<ItemList>(request).await? {
            ItemList::Wrapped { items } | ItemList::Bare(items) => Ok(items),
        }
    }

    async fn add_item(&self, item: &NewLostFoundItem) -> PortResult<LostFoundItem> {
        let request = self.client.post(self.url("/api/add-lost-found-item/")).json(item);
        match self.send::<CreatedItem>(request).await? {
            CreatedItem::Wrapped { data } | CreatedItem::Bare(data) => Ok(data),
        }
    }

    async fn update_item_status(&self, report_id: i64, status: ItemStatus) -> PortResult<()> {
        let request = self
            .client
            .post(self.url("/api/update-lost-found-item/"))
            .json(&json!({ "report_id": report_id, "status": status }));
        self.send::<IgnoredAny>(request).await?;
        Ok(())
    }

    async fn delete_item(&self, report_id: i64) -> PortResult<()> {
        let request = self
            .client
            .post(self.url("/api/delete-lost-found-item/"))
            .json(&json!({ "report_id": report_id }));
        self.send::<IgnoredAny>(request).await?;
        Ok(())
    }
}

#[async_trait]
impl TravelGateway for HttpGateway {
    async fn location_alerts(&self, location: &str) -> PortResult<AlertReport> {
        let request = self
            .client
            .get(self.url("/api/alerts/location/"))
            .query(&[("location", location)]);
        self.send(request).await
    }

    async fn destination_suggestions(
        &self,
        query: &SuggestionQuery,
    ) -> PortResult<Vec<DestinationSuggestion>> {
        let request = self.client.post(self.url("/travel-suggestions/")).json(query);
        let response: SuggestionsResponse = self.send(request).await?;
        Ok(response.suggestions)
    }

    async fn generate_trip(&self, request: &TripRequest) -> PortResult<TripPlan> {
        let request = self.client.post(self.url("/api/generate-trip/")).json(request);
        let response: TripResponse = self.send(request).await?;
        decode_trip_plan(response.trip_plan)
    }

    async fn translate(&self, request: &TranslationRequest) -> PortResult<Translation> {
        let request = self.client.post(self.url("/api/translate/")).json(request);
        self.send(request).await
    }

    async fn transport_routes(&self, query: &RouteQuery) -> PortResult<Vec<TransportRoute>> {
        let request = self.client.post(self.url("/api/transport-routes/")).json(query);
        let response: RoutesResponse = self.send(request).await?;
        Ok(response.routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[test]
    fn envelope_failures_are_detected_in_both_conventions() {
        let django = json!({"status": "error", "message": "User not found"});
        assert_eq!(rejection(&django, false), Some(Some("User not found".to_string())));

        let express = json!({"success": false});
        assert_eq!(rejection(&express, true), Some(None));

        let ok = json!({"status": "success", "user": {"id": 1}});
        assert_eq!(rejection(&ok, true), None);

        let bare_list = json!([]);
        assert_eq!(rejection(&bare_list, true), None);
    }

    #[test]
    fn trip_plans_decode_from_fenced_strings() {
        let fenced = Value::String(
            "```json\n[{\"places\":\"Amer Fort\",\"food\":\"Dal baati\",\"activities\":\"Walk\",\"budget\":\"2000\"}]\n```"
                .to_string(),
        );
        let plan = decode_trip_plan(fenced).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].places, "Amer Fort");

        let structured = json!([{"places": "Hawa Mahal"}]);
        assert_eq!(decode_trip_plan(structured).unwrap()[0].places, "Hawa Mahal");

        assert!(decode_trip_plan(Value::String("not a plan".into())).is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let gateway = HttpGateway::new(Client::new(), "http://127.0.0.1:8000/");
        assert_eq!(gateway.url("/api/login/"), "http://127.0.0.1:8000/api/login/");
    }

    #[tokio::test]
    async fn suggestions_are_posted_to_the_travel_suggestions_path() {
        let seen = Arc::new(Mutex::new(Vec::<(String, String)>::new()));
        let recorder = seen.clone();
        let app = axum::Router::new().fallback(
            move |method: axum::http::Method, uri: axum::http::Uri| {
                let recorder = recorder.clone();
                async move {
                    recorder
                        .lock()
                        .await
                        .push((method.to_string(), uri.path().to_string()));
                    axum::Json(json!({"status": "success", "suggestions": []}))
                }
            },
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let gateway = HttpGateway::new(Client::new(), format!("http://{}", addr));
        let query = SuggestionQuery {
            interests: "forts".into(),
            ..Default::default()
        };
        let found = gateway.destination_suggestions(&query).await.unwrap();

        assert!(found.is_empty());
        assert_eq!(
            *seen.lock().await,
            vec![("POST".to_string(), "/travel-suggestions/".to_string())]
        );
    }
}
