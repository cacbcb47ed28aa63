use actix_web::{App, HttpServer, web};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use trip_planner::application::auth_service::AuthService;
use trip_planner::client::api::{ApiClient, ClientError};
use trip_planner::client::forms::{
    FormData, FormState, Submission, activity_body, child_route, trip_body, trip_route,
};
use trip_planner::client::overview::TripDashboard;
use trip_planner::client::view::{Screen, Store};
use trip_planner::data::user_repository::InMemoryUserRepository;
use trip_planner::domain::activity::{Activity, ActivityBody};
use trip_planner::domain::expense::{Expense, ExpenseBody, ExpenseType};
use trip_planner::domain::note::{Note, NoteBody, NoteType};
use trip_planner::domain::trip::{Trip, TripBody, TripPatch};
use trip_planner::domain::user::CreateUser;
use trip_planner::presentation::handlers::AppState;
use trip_planner::presentation::routes::configure;
use uuid::Uuid;

async fn spawn_app() -> String {
    let auth_service = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        "test-secret-key-for-client-tests".to_string(),
        3600,
    ));
    let state = web::Data::new(AppState::in_memory(auth_service.clone()));

    let server = HttpServer::new(move || {
        let auth_service = auth_service.clone();
        App::new()
            .app_data(state.clone())
            .configure(|cfg| configure(cfg, auth_service))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

async fn logged_in_client(base_url: &str, email: &str) -> ApiClient {
    let client = ApiClient::new(base_url);
    client
        .register(&CreateUser {
            email: email.to_string(),
            name: "Traveller".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();
    client.login(email, "secret123").await.unwrap();
    client
}

fn paris_form() -> FormData {
    FormData::new()
        .with("destination", "Paris")
        .with("start", "2025-06-01")
        .with("end", "2025-06-07")
        .with("transportation", "Plane")
        .with("expenseLimitEnabled", "on")
        .with("expenseLimit", "300")
        .with("myCurrency", "EUR")
        .with("localCurrency", "EUR")
}

#[actix_web::test]
async fn test_client_trip_lifecycle() {
    let base_url = spawn_app().await;
    let client = logged_in_client(&base_url, "alice@example.com").await;

    let profile = client.current_user().await.unwrap();
    assert_eq!(profile.email, "alice@example.com");

    let mut form = FormState::default();
    let outcome = form
        .submit(
            trip_body(&paris_form()),
            |body: TripBody| {
                let client = client.clone();
                async move { client.create_trip(&body).await }
            },
            trip_route,
        )
        .await;
    let trips = client.list_trips().await.unwrap();
    assert_eq!(trips.len(), 1);
    let trip = &trips[0];
    assert_eq!(outcome, Submission::Navigate(format!("/trips/{}", trip.id)));
    assert_eq!(trip.limit, Some(300.0));

    let activity_form = FormData::new()
        .with("name", "Eiffel Tower")
        .with("location", "Champ de Mars")
        .with("type", "Culture")
        .with("start-date", "2025-06-02")
        .with("start-time", "09:00");
    let outcome = form
        .submit(
            activity_body(&activity_form),
            |body: ActivityBody| {
                let client = client.clone();
                let trip_id = trip.id;
                async move { client.create_record::<Activity>(trip_id, &body).await }
            },
            child_route::<Activity>,
        )
        .await;
    assert_eq!(
        outcome,
        Submission::Navigate(format!("/trips/{}/activities", trip.id))
    );

    client
        .create_record::<Note>(
            trip.id,
            &NoteBody {
                title: "Passport".to_string(),
                note: "Bring it".to_string(),
                kind: NoteType::Important,
            },
        )
        .await
        .unwrap();
    client
        .create_record::<Expense>(
            trip.id,
            &ExpenseBody {
                description: "Hotel".to_string(),
                kind: ExpenseType::Accommodation,
                amount: 250.0,
                date: trip.start,
            },
        )
        .await
        .unwrap();

    let now = Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap();
    let dashboard = TripDashboard::load(&client, trip.id, now, None).await.unwrap();
    assert_eq!(dashboard.countdown, "Trip has started!");
    assert_eq!(dashboard.important_notes.len(), 1);
    assert_eq!(dashboard.next_activities[0].name, "Eiffel Tower");
    assert_eq!(dashboard.budget.remaining, Some(50.0));

    let renamed: Trip = client
        .update_trip(
            trip.id,
            &TripPatch {
                destination: Some("Paris & Versailles".to_string()),
                ..TripPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.destination, "Paris & Versailles");

    client.delete_trip(trip.id).await.unwrap();
    let activities = client.list_records::<Activity>(trip.id).await.unwrap();
    assert!(activities.is_empty());
}

#[actix_web::test]
async fn test_client_surfaces_server_message() {
    let base_url = spawn_app().await;
    let client = logged_in_client(&base_url, "bob@example.com").await;

    let err = client.get_trip(Uuid::new_v4()).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Trip not found");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(client.session().is_logged_in().await);
}

#[actix_web::test]
async fn test_unauthorized_response_logs_out() {
    let base_url = spawn_app().await;
    let client = logged_in_client(&base_url, "carol@example.com").await;

    client.session().set_token("expired-token".to_string()).await;
    let err = client.list_trips().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!client.session().is_logged_in().await);
}

#[actix_web::test]
async fn test_login_failure_keeps_server_message() {
    let base_url = spawn_app().await;
    let client = ApiClient::new(base_url);

    let err = client.login("nobody@example.com", "whatever").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");
}

#[actix_web::test]
async fn test_store_renders_loaded_trips() {
    let base_url = spawn_app().await;
    let client = logged_in_client(&base_url, "dave@example.com").await;
    client
        .create_trip(&trip_body(&paris_form()).unwrap())
        .await
        .unwrap();

    let renders = Arc::new(std::sync::Mutex::new(0));
    let counter = renders.clone();
    let mut store = Store::<Vec<Trip>>::new(move |_| *counter.lock().unwrap() += 1);

    store.load(client.list_trips()).await;

    match store.state().screen() {
        Screen::Content(trips) => assert_eq!(trips[0].destination, "Paris"),
        other => panic!("unexpected screen: {other:?}"),
    }
    assert_eq!(*renders.lock().unwrap(), 3);
}
