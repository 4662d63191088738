use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub starttls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub admin_email: String,
    pub admin_password: String,
    pub session_ttl_hours: i64,
    pub seed_demo: bool,
    pub smtp: Option<SmtpConfig>,
    pub notify_webhook_url: Option<String>,
    pub notify_rps: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "5000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://cinemapulse.db?mode=rwc".to_string());

        let store_backend = match std::env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("sqlite") | Err(_) => StoreBackend::Sqlite,
            Ok(other) => anyhow::bail!("STORE_BACKEND must be sqlite or memory, got {other}"),
        };

        let admin_email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        let session_ttl_hours: i64 =
            std::env::var("SESSION_TTL_HOURS").ok().and_then(|s| s.parse().ok()).unwrap_or(24);

        let seed_demo = std::env::var("SEED_DEMO").map(|s| flag(&s)).unwrap_or(true);

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(587),
                starttls: std::env::var("SMTP_STARTTLS").map(|s| flag(&s)).unwrap_or(true),
                username: std::env::var("SMTP_USERNAME").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
                from: std::env::var("SMTP_FROM").context("SMTP_FROM is required with SMTP_HOST")?,
                to: std::env::var("SMTP_TO")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|a| !a.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            }),
            _ => None,
        };

        let notify_webhook_url =
            std::env::var("NOTIFY_WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty());

        let notify_rps: u32 =
            std::env::var("NOTIFY_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(2);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            store_backend,
            admin_email,
            admin_password,
            session_ttl_hours,
            seed_demo,
            smtp,
            notify_webhook_url,
            notify_rps,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            addr: "127.0.0.1:0".parse().expect("static addr"),
            database_url: "sqlite::memory:".to_string(),
            store_backend: StoreBackend::Memory,
            admin_email: "admin@example.com".to_string(),
            admin_password: "admin123".to_string(),
            session_ttl_hours: 1,
            seed_demo: false,
            smtp: None,
            notify_webhook_url: None,
            notify_rps: 1,
        }
    }
}

fn flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::flag;

    #[test]
    fn flags_accept_common_spellings() {
        assert!(flag("True"));
        assert!(flag(" yes "));
        assert!(flag("1"));
        assert!(!flag("False"));
        assert!(!flag(""));
    }
}
