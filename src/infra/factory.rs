use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::{auth_service::AuthService, rsvp_service::RsvpService};
use crate::infra::ai::openai_service::OpenAiService;
use crate::infra::repositories::{
    postgres_chat_log_repo::PostgresChatLogRepo, postgres_event_repo::PostgresEventRepo,
    postgres_feedback_repo::PostgresFeedbackRepo, postgres_reservation_repo::PostgresReservationRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_chat_log_repo::SqliteChatLogRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_feedback_repo::SqliteFeedbackRepo, sqlite_reservation_repo::SqliteReservationRepo,
    sqlite_user_repo::SqliteUserRepo,
};
use crate::realtime::countdown::{CountdownBroadcaster, CountdownRegistry};
use crate::realtime::hub::EventHub;
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresReservationRepo::new(pool.clone())),
            Arc::new(PostgresFeedbackRepo::new(pool.clone())),
            Arc::new(PostgresChatLogRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqliteFeedbackRepo::new(pool.clone())),
            Arc::new(SqliteChatLogRepo::new(pool)),
        )
    }
}

fn assemble_state(
    config: &Config,
    user_repo: Arc<dyn crate::domain::ports::UserRepository>,
    event_repo: Arc<dyn crate::domain::ports::EventRepository>,
    reservation_repo: Arc<dyn crate::domain::ports::ReservationRepository>,
    feedback_repo: Arc<dyn crate::domain::ports::FeedbackRepository>,
    chat_log_repo: Arc<dyn crate::domain::ports::ChatLogRepository>,
) -> AppState {
    let hub = Arc::new(EventHub::with_default_capacity());

    let countdown = Arc::new(CountdownBroadcaster::new(
        CountdownRegistry::new(),
        event_repo.clone(),
        hub.clone(),
        Duration::from_secs(config.countdown_interval_secs),
        config.countdown_lookback_hours,
    ));

    let rsvp_service = Arc::new(RsvpService::new(
        event_repo.clone(),
        reservation_repo.clone(),
        hub.clone(),
    ));

    AppState {
        config: config.clone(),
        user_repo,
        event_repo,
        reservation_repo,
        feedback_repo,
        chat_log_repo,
        auth_service: Arc::new(AuthService::new(config)),
        rsvp_service,
        llm_service: Arc::new(OpenAiService::new()),
        hub,
        countdown,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
