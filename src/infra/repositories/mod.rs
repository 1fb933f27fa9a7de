pub mod sqlite_chat_log_repo;
pub mod sqlite_event_repo;
pub mod sqlite_feedback_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_user_repo;

pub mod postgres_chat_log_repo;
pub mod postgres_event_repo;
pub mod postgres_feedback_repo;
pub mod postgres_reservation_repo;
pub mod postgres_user_repo;
