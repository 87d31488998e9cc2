use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Signing secrets are distinct for access vs refresh tokens and have no
    /// in-code fallback; startup fails when either is unset.
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let access_token_secret = env_required("ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = env_required("REFRESH_TOKEN_SECRET")?;

        let host: IpAddr = env_or("ADMIND_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ADMIND_HOST: {e}"))?;

        let port: u16 = env_or("ADMIND_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ADMIND_PORT: {e}"))?;

        let log_level = env_or("ADMIND_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            access_token_secret,
            refresh_token_secret,
            host,
            port,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
