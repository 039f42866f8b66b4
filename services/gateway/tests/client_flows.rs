//! End-to-end flows: the client stores driven through `HttpGateway` against
//! the in-memory mock gateway on an ephemeral port.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gateway_lib::{
    client::{connect, connect_with},
    config::ClientConfig,
    web::{router, AppState},
};
use tokio::sync::broadcast::Receiver;
use traveller_core::domain::{
    AlertBoard, Credentials, ItemStatus, LovedOne, NewLostFoundItem, Registration, RouteQuery,
    SuggestionQuery, TranslationRequest, TripRequest, UserType,
};
use traveller_core::store::QueryOutcome;
use traveller_core::{
    AppContext, NotificationEvent, Notifier, RetryPolicy, StaticLocation, StoreSettings,
};

async fn spawn_gateway() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(AppState::new()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_config(gateway_url: &str, session_dir: &Path) -> ClientConfig {
    ClientConfig {
        gateway_url: gateway_url.to_string(),
        session_dir: session_dir.to_path_buf(),
        store: StoreSettings {
            retry: RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(10),
            },
            ..StoreSettings::default()
        },
    }
}

async fn start(config: &ClientConfig) -> (AppContext, Receiver<NotificationEvent>) {
    let notifier = Notifier::default();
    let rx = notifier.subscribe();
    let ctx = connect_with(config, notifier).await.unwrap();
    (ctx, rx)
}

/// Drains the channel and returns the messages of every shown notification.
fn messages(rx: &mut Receiver<NotificationEvent>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let NotificationEvent::Shown(notification) = event {
            out.push(notification.message);
        }
    }
    out
}

fn asha() -> Registration {
    Registration {
        name: "Asha".into(),
        email: "asha@example.com".into(),
        phone: "9000000001".into(),
        password: "monsoon".into(),
        user_type: UserType::Traveler,
    }
}

fn asha_credentials() -> Credentials {
    Credentials {
        email: "asha@example.com".into(),
        password: "monsoon".into(),
    }
}

#[tokio::test]
async fn traveller_journey_survives_a_restart() {
    let url = spawn_gateway().await;
    let dir = tempfile::tempdir().unwrap();
    let config = client_config(&url, dir.path());
    let (ctx, mut rx) = start(&config).await;
    assert!(!ctx.session.logged_in().await);

    // Registration does not hand back a user, so a login follows.
    assert!(ctx.session.register(&asha()).await);
    assert!(!ctx.session.logged_in().await);
    assert!(ctx.session.login(&asha_credentials()).await);
    let user = ctx.session.user().await.unwrap();
    assert_eq!(user.name, "Asha");
    assert_eq!(user.user_type, Some(UserType::Traveler));
    messages(&mut rx);

    // SOS needs at least one emergency contact.
    let here = StaticLocation::at(19.076, 72.8777);
    assert!(!ctx.session.send_sos_from_device(&here).await);
    assert_eq!(
        messages(&mut rx),
        vec!["No emergency contacts found. Please add emergency contacts first."]
    );

    let mother = LovedOne {
        name: "Meera".into(),
        email: "meera@example.com".into(),
    };
    assert!(ctx.session.add_loved_one(&mother).await);
    assert_eq!(ctx.session.user().await.unwrap().loved_ones, vec![mother]);
    assert!(ctx.session.send_sos_from_device(&here).await);
    assert_eq!(
        messages(&mut rx).last().map(String::as_str),
        Some("SOS alerts sent successfully to 1 contacts")
    );

    // Lost & found lifecycle.
    let backpack = NewLostFoundItem {
        user_id: user.id,
        location: "Andheri Station".into(),
        item_description: "Black backpack".into(),
        status: ItemStatus::Found,
        date_found: None,
    };
    assert!(ctx.lost_found.add_item(backpack).await);
    let items = ctx.lost_found.items().await;
    assert_eq!(items.len(), 1);
    assert!(items[0].date_found.is_some());
    assert!(items[0].report_date.is_some());
    let report_id = items[0].report_id;

    assert!(ctx.lost_found.update_item_status(report_id, ItemStatus::Recovered).await);
    assert!(!ctx.lost_found.update_item_status(report_id, ItemStatus::Lost).await);
    assert!(ctx.lost_found.fetch_items().await);
    assert_eq!(ctx.lost_found.items().await[0].status, ItemStatus::Recovered);
    assert!(ctx.lost_found.delete_item(report_id).await);
    assert!(ctx.lost_found.items().await.is_empty());

    ctx.shutdown().await;

    // A new container over the same directory comes back logged in.
    let (restarted, _rx) = start(&config).await;
    assert!(restarted.session.logged_in().await);
    let rehydrated = restarted.session.user().await.unwrap();
    assert_eq!(rehydrated.id, user.id);
    assert_eq!(rehydrated.loved_ones.len(), 1);

    restarted.session.logout().await;
    let (after_logout, _rx) = start(&config).await;
    assert!(!after_logout.session.logged_in().await);
}

#[tokio::test]
async fn gateway_rejections_reach_the_user_verbatim() {
    let url = spawn_gateway().await;
    let dir = tempfile::tempdir().unwrap();
    let (ctx, mut rx) = start(&client_config(&url, dir.path())).await;

    assert!(!ctx.session.login(&asha_credentials()).await);
    assert!(ctx.session.register(&asha()).await);
    assert!(!ctx.session.register(&asha()).await);
    let wrong = Credentials {
        password: "drought".into(),
        ..asha_credentials()
    };
    assert!(!ctx.session.login(&wrong).await);

    let shown = messages(&mut rx);
    assert_eq!(shown[0], "User not found");
    assert!(shown.contains(&"A user with this email already exists".to_string()));
    assert_eq!(shown.last().map(String::as_str), Some("Invalid credentials"));

    // Unknown report ids are forwarded and rejected by the gateway.
    assert!(!ctx.lost_found.update_item_status(404, ItemStatus::Recovered).await);
    assert!(ctx.lost_found.items().await.is_empty());
}

#[tokio::test]
async fn travel_queries_round_trip_through_the_gateway() {
    let url = spawn_gateway().await;
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _rx) = start(&client_config(&url, dir.path())).await;

    assert!(ctx.alerts.query("Goa").await);
    let Some(QueryOutcome::Fresh(board)) = ctx.alerts.outcome().await else {
        panic!("expected fresh alerts");
    };
    assert_eq!(board.alerts.len(), 2);
    assert_eq!(board.alerts[0].title, "Safety Analysis");
    assert_eq!(
        board.analysis.unwrap().precautions,
        vec!["Stay updated with local news."]
    );

    let query = SuggestionQuery {
        interests: "mountains".into(),
        ..SuggestionQuery::default()
    };
    assert!(ctx.suggestions.query(&query).await);
    let Some(QueryOutcome::Fresh(found)) = ctx.suggestions.outcome().await else {
        panic!("expected fresh suggestions");
    };
    assert_eq!(found.len(), 2);

    let trip = TripRequest {
        days: 2,
        budget: 10000,
        place: "Jaipur".into(),
        activity: "heritage walks".into(),
    };
    assert!(ctx.trips.generate(&trip).await);
    let plan = ctx.trips.snapshot().await.plan.unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].budget, "5000 INR");

    let translation = ctx
        .desk
        .translate(&TranslationRequest {
            source_text: "Where is the station?".into(),
            source_lang: "en".into(),
            target_lang: "hi".into(),
        })
        .await
        .unwrap();
    assert_eq!(translation.translated_text, "[hi] Where is the station?");

    let routes = ctx
        .desk
        .transport_routes(&RouteQuery {
            source: "Colaba".into(),
            destination: "Bandra".into(),
        })
        .await
        .unwrap();
    assert_eq!(routes.len(), 3);
    assert_eq!(routes[0].crowd_level, "high");
}

#[tokio::test]
async fn unreachable_gateway_falls_back_to_sample_alerts() {
    // Reserve a port, then close it so every connection is refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let (ctx, mut rx) = start(&client_config(&url, dir.path())).await;

    assert!(!ctx.alerts.query("Shimla").await);
    assert_eq!(
        ctx.alerts.outcome().await,
        Some(QueryOutcome::Fallback(AlertBoard::sample()))
    );

    assert!(!ctx.session.login(&asha_credentials()).await);
    let shown = messages(&mut rx);
    assert_eq!(
        shown,
        vec![
            "Failed to fetch alerts. Please try again later.",
            "Login failed. Please try again.",
        ]
    );
}

#[tokio::test]
async fn connect_creates_the_session_directory() {
    let dir = tempfile::tempdir().unwrap();
    let session_dir = dir.path().join("nested").join("session");
    let ctx = connect(&client_config("http://127.0.0.1:9", &session_dir))
        .await
        .unwrap();

    assert!(session_dir.is_dir());
    assert!(!ctx.session.logged_in().await);
    ctx.shutdown().await;
}
