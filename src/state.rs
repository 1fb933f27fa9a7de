use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    ChatLogRepository, EventRepository, FeedbackRepository, LlmService,
    ReservationRepository, UserRepository,
};
use crate::domain::services::{auth_service::AuthService, rsvp_service::RsvpService};
use crate::realtime::countdown::CountdownBroadcaster;
use crate::realtime::hub::EventHub;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub feedback_repo: Arc<dyn FeedbackRepository>,
    pub chat_log_repo: Arc<dyn ChatLogRepository>,
    pub auth_service: Arc<AuthService>,
    pub rsvp_service: Arc<RsvpService>,
    pub llm_service: Arc<dyn LlmService>,
    pub hub: Arc<EventHub>,
    pub countdown: Arc<CountdownBroadcaster>,
}
