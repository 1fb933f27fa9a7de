use rsvp_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{
        ChatLogRepository, EventRepository, FeedbackRepository, LlmService,
        ReservationRepository, UserRepository,
    },
    domain::services::{auth_service::AuthService, rsvp_service::RsvpService},
    error::AppError,
    infra::repositories::{
        sqlite_chat_log_repo::SqliteChatLogRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_feedback_repo::SqliteFeedbackRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    realtime::countdown::{CountdownBroadcaster, CountdownRegistry},
    realtime::hub::EventHub,
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockLlmService;

#[async_trait]
impl LlmService for MockLlmService {
    async fn generate(
        &self,
        _api_key: &str,
        _prompt: &str,
        _system_instruction: &str
    ) -> Result<String, AppError> {
        Ok("Mock AI Response: here are some events you might like.".to_string())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        // A long tick interval keeps countdown tasks quiet unless a test
        // explicitly exercises them.
        Self::with_countdown_interval(Duration::from_secs(60)).await
    }

    pub async fn with_countdown_interval(tick_interval: Duration) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 24,
            countdown_interval_secs: 30,
            countdown_lookback_hours: 2,
            ai_api_key: String::new(),
        };

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));
        let event_repo: Arc<dyn EventRepository> = Arc::new(SqliteEventRepo::new(pool.clone()));
        let reservation_repo: Arc<dyn ReservationRepository> =
            Arc::new(SqliteReservationRepo::new(pool.clone()));
        let feedback_repo: Arc<dyn FeedbackRepository> =
            Arc::new(SqliteFeedbackRepo::new(pool.clone()));
        let chat_log_repo: Arc<dyn ChatLogRepository> =
            Arc::new(SqliteChatLogRepo::new(pool.clone()));

        let hub = Arc::new(EventHub::with_default_capacity());
        let countdown = Arc::new(CountdownBroadcaster::new(
            CountdownRegistry::new(),
            event_repo.clone(),
            hub.clone(),
            tick_interval,
            config.countdown_lookback_hours,
        ));
        let rsvp_service = Arc::new(RsvpService::new(
            event_repo.clone(),
            reservation_repo.clone(),
            hub.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(&config));

        let state = Arc::new(AppState {
            config,
            user_repo,
            event_repo,
            reservation_repo,
            feedback_repo,
            chat_log_repo,
            auth_service,
            rsvp_service,
            llm_service: Arc::new(MockLlmService),
            hub,
            countdown,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Registers a fresh user and logs them in. Returns (bearer token, user id).
    pub async fn register_and_login(&self, name: &str, email: &str) -> (String, String) {
        let res = self.router.clone().oneshot(
            Request::builder().method("POST").uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({
                    "name": name, "email": email, "password": "secret123"
                }).to_string())).unwrap()
        ).await.unwrap();
        assert!(res.status().is_success(), "register failed in test helper: {}", res.status());

        let res = self.router.clone().oneshot(
            Request::builder().method("POST").uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({
                    "email": email, "password": "secret123"
                }).to_string())).unwrap()
        ).await.unwrap();
        assert!(res.status().is_success(), "login failed in test helper: {}", res.status());

        let body = read_json(res).await;
        (
            body["token"].as_str().expect("no token in login response").to_string(),
            body["user"]["id"].as_str().expect("no user id in login response").to_string(),
        )
    }

    pub async fn create_event(&self, token: &str, payload: Value) -> Value {
        let res = self.router.clone().oneshot(
            Request::builder().method("POST").uri("/api/events")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(payload.to_string())).unwrap()
        ).await.unwrap();
        assert!(res.status().is_success(), "create_event failed in test helper: {}", res.status());
        read_json(res).await
    }

    /// Inserts an event row directly, bypassing API validation. Needed for
    /// past events and for rows with an invalid duration.
    pub async fn insert_event_raw(
        &self,
        created_by: &str,
        start: DateTime<Utc>,
        duration_min: i32,
        total_slots: i32,
        available_slots: i32,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"INSERT INTO events (
                id, title, description, category, location, time, duration_min,
                total_slots, available_slots, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
            .bind(&id)
            .bind("League Match")
            .bind(Option::<String>::None)
            .bind("soccer")
            .bind("Stadium 1")
            .bind(start)
            .bind(duration_min)
            .bind(total_slots)
            .bind(available_slots)
            .bind(created_by)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .unwrap();
        id
    }

    pub async fn insert_reservation_raw(&self, user_id: &str, event_id: &str, status: &str) {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO reservations (id, user_id, event_id, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(event_id)
            .bind(status)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn event_row(&self, event_id: &str) -> (i32, i32) {
        use sqlx::Row;
        let row = sqlx::query("SELECT total_slots, available_slots FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .unwrap();
        (row.get("total_slots"), row.get("available_slots"))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Payload for a valid future event; tests tweak fields as needed.
#[allow(dead_code)]
pub fn event_payload(total_slots: i32) -> Value {
    json!({
        "title": "Friday Pickup Soccer",
        "description": "Casual 5-a-side",
        "category": "soccer",
        "location": "Riverside Park",
        "time": (Utc::now() + chrono::Duration::hours(3)).to_rfc3339(),
        "duration_min": 90,
        "total_slots": total_slots
    })
}
