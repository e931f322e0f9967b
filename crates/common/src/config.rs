use serde::{Deserialize, Serialize};

/// Host-side notification settings consulted on every event.
///
/// The two `*_field` flags mirror whether the corresponding custom attribute
/// exists on the host schema at all, which is distinct from a project or user
/// simply leaving it blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Fallback webhook used when no project in the hierarchy overrides it.
    #[serde(default)]
    pub default_webhook_url: Option<String>,

    /// Whether projects carry a webhook override attribute.
    #[serde(default = "enabled")]
    pub project_webhook_field: bool,

    /// Whether users carry an opt-out attribute. When `false` every
    /// notification is suppressed.
    #[serde(default = "enabled")]
    pub user_opt_out_field: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            default_webhook_url: None,
            project_webhook_field: true,
            user_opt_out_field: true,
        }
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the API server binds to (default: 0.0.0.0:3000)
    pub listen_addr: String,

    /// Outbound webhook request timeout in seconds (default: 5)
    pub webhook_timeout_secs: u64,

    /// Emit JSON-formatted logs instead of human-readable text
    pub log_json: bool,

    /// Initial notification settings
    pub notifications: NotificationSettings,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            webhook_timeout_secs: std::env::var("WEBHOOK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("WEBHOOK_TIMEOUT_SECS must be a valid u64"))?,
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            notifications: NotificationSettings {
                default_webhook_url: std::env::var("DEFAULT_WEBHOOK_URL")
                    .ok()
                    .filter(|v| !v.trim().is_empty()),
                project_webhook_field: env_flag("PROJECT_WEBHOOK_FIELD", true)?,
                user_opt_out_field: env_flag("USER_OPT_OUT_FIELD", true)?,
            },
        })
    }
}

fn env_flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(name) {
        Ok(raw) => parse_flag(&raw)
            .ok_or_else(|| anyhow::anyhow!("{} must be one of true/false/1/0/yes/no", name)),
        Err(_) => Ok(default),
    }
}

/// Parse a boolean environment value.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
