//! crates/traveller_core/src/domain.rs
//!
//! Defines the core data structures shared by the stores and the gateway.
//! Field names follow the gateway's JSON wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Identity & Session
//=========================================================================================

/// The two account kinds the gateway accepts at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Traveler,
    Community,
}

/// An emergency contact notified by SOS alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LovedOne {
    pub name: String,
    pub email: String,
}

/// The authenticated user, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub loved_ones: Vec<LovedOne>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The persisted subset of the session store.
///
/// `logged_in` is true iff `user` is present; [`Session::normalized`] restores
/// that after reading untrusted data from storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn for_user(user: User) -> Self {
        Self {
            logged_in: true,
            user: Some(user),
        }
    }

    pub fn normalized(self) -> Self {
        match self.user {
            Some(user) => Self::for_user(user),
            None => Self::logged_out(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The gateway's acknowledgement of a dispatched SOS alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_contacts: u32,
    #[serde(default)]
    pub successful_sends: u32,
    #[serde(default)]
    pub failed_sends: u32,
}

//=========================================================================================
// Lost & Found
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Lost,
    Found,
    Recovered,
}

impl ItemStatus {
    /// `Lost` and `Found` are start states; both may only move to `Recovered`.
    /// Re-applying the current status is accepted as a no-op.
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        self == next
            || matches!(
                (self, next),
                (ItemStatus::Lost, ItemStatus::Recovered)
                    | (ItemStatus::Found, ItemStatus::Recovered)
            )
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Lost => "Lost",
            ItemStatus::Found => "Found",
            ItemStatus::Recovered => "Recovered",
        };
        f.write_str(s)
    }
}

/// A server-confirmed lost/found report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostFoundItem {
    pub report_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub item_description: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub report_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_found: Option<DateTime<Utc>>,
}

/// A report that has not been acknowledged yet, so it has no `report_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLostFoundItem {
    pub user_id: i64,
    pub location: String,
    pub item_description: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub date_found: Option<DateTime<Utc>>,
}

//=========================================================================================
// Alerts
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafetyAnalysis {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
}

/// The raw answer of the location alerts endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertReport {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub news: Vec<NewsArticle>,
    pub analysis: SafetyAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Rainfall,
    Temperature,
    Wind,
    Alert,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A single displayable alert card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub description: String,
    pub kind: AlertKind,
    pub time: String,
    pub location: String,
    pub severity: Severity,
}

/// What the alerts view shows after a query: alert cards plus the analysis
/// and news that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertBoard {
    pub alerts: Vec<Alert>,
    pub analysis: Option<SafetyAnalysis>,
    pub news: Vec<NewsArticle>,
}

impl AlertBoard {
    /// Expands a gateway report into cards: one "Safety Analysis" card followed
    /// by one "Alert" card per server-side alert.
    pub fn from_report(report: AlertReport, location: &str) -> Self {
        let mut alerts = Vec::with_capacity(report.analysis.alerts.len() + 1);
        alerts.push(Alert {
            title: "Safety Analysis".to_string(),
            description: report.analysis.analysis.clone(),
            kind: AlertKind::Alert,
            time: "Current".to_string(),
            location: location.to_string(),
            severity: Severity::Medium,
        });
        alerts.extend(report.analysis.alerts.iter().map(|text| Alert {
            title: "Alert".to_string(),
            description: text.clone(),
            kind: AlertKind::Warning,
            time: "Current".to_string(),
            location: location.to_string(),
            severity: Severity::High,
        }));

        Self {
            alerts,
            analysis: Some(report.analysis),
            news: report.news,
        }
    }

    /// The sample board shown before any query, and after exhausted retries
    /// under the `Defaults` fallback policy.
    pub fn sample() -> Self {
        let card = |title: &str,
                    description: &str,
                    kind: AlertKind,
                    time: &str,
                    location: &str,
                    severity: Severity| Alert {
            title: title.to_string(),
            description: description.to_string(),
            kind,
            time: time.to_string(),
            location: location.to_string(),
            severity,
        };
        Self {
            alerts: vec![
                card(
                    "Heavy Rainfall Expected",
                    "Heavy rainfall predicted in the next 24 hours. Please take necessary precautions.",
                    AlertKind::Rainfall,
                    "Next 24 hours",
                    "Mumbai, Maharashtra",
                    Severity::High,
                ),
                card(
                    "High Temperature Alert",
                    "Temperature expected to reach 40°C. Stay hydrated and avoid outdoor activities.",
                    AlertKind::Temperature,
                    "Today",
                    "Delhi, NCR",
                    Severity::Medium,
                ),
                card(
                    "Strong Winds Warning",
                    "Wind speeds may exceed 50 km/h. Secure loose objects and stay indoors.",
                    AlertKind::Wind,
                    "Tomorrow",
                    "Chennai, Tamilnadu",
                    Severity::Low,
                ),
            ],
            analysis: None,
            news: Vec::new(),
        }
    }
}

//=========================================================================================
// Travel planning
//=========================================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionQuery {
    pub interests: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub travelers: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSuggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: String,
    #[serde(default)]
    pub cost_range: String,
    #[serde(default)]
    pub best_time: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub days: u32,
    pub budget: u64,
    pub place: String,
    pub activity: String,
}

/// One day of a generated trip plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripDay {
    #[serde(default)]
    pub places: String,
    #[serde(default)]
    pub food: String,
    #[serde(default)]
    pub activities: String,
    #[serde(default)]
    pub budget: String,
}

pub type TripPlan = Vec<TripDay>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteQuery {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRoute {
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub crowd_level: String,
    #[serde(default)]
    pub description: String,
}
