use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub countdown_interval_secs: u64,
    pub countdown_lookback_hours: i64,
    pub ai_api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3001".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("TOKEN_TTL_HOURS must be a number"),
            countdown_interval_secs: env::var("COUNTDOWN_INTERVAL_SECS").unwrap_or_else(|_| "30".to_string()).parse().expect("COUNTDOWN_INTERVAL_SECS must be a number"),
            countdown_lookback_hours: env::var("COUNTDOWN_LOOKBACK_HOURS").unwrap_or_else(|_| "2".to_string()).parse().expect("COUNTDOWN_LOOKBACK_HOURS must be a number"),
            ai_api_key: env::var("AI_API_KEY").unwrap_or_default(),
        }
    }
}
