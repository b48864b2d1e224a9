use std::env;

pub const DEFAULT_COMMISSION_RATE: f64 = 0.4;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub staff_token: String,
    pub cache_ttl_secs: u64,
    pub poll_interval_secs: u64,
    /// Used when the shop config row has not been written yet.
    pub default_commission_rate: f64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salonbook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            staff_token: env::var("STAFF_TOKEN").unwrap_or_else(|_| "staff".to_string()),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            default_commission_rate: env::var("DEFAULT_COMMISSION_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|r: &f64| (0.0..=1.0).contains(r))
                .unwrap_or(DEFAULT_COMMISSION_RATE),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.admin_token.is_empty(), "ADMIN_TOKEN must not be empty");
        anyhow::ensure!(!self.staff_token.is_empty(), "STAFF_TOKEN must not be empty");
        anyhow::ensure!(
            self.admin_token != self.staff_token,
            "ADMIN_TOKEN and STAFF_TOKEN must differ"
        );
        Ok(())
    }
}
