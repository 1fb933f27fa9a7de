pub mod auth_service;
pub mod lifecycle;
pub mod rsvp_service;
