use chrono_tz::Tz;
use std::path::PathBuf;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
pub const DEFAULT_TOKEN_PATH: &str = "token.json";
pub const DEFAULT_TIME_ZONE: &str = "Africa/Tunis";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Process-wide settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP listener binds to
    pub port: u16,

    /// OAuth scopes requested at sign-in
    pub scopes: Vec<String>,

    /// Client credentials file (Google "web" or "installed" JSON)
    pub credentials_path: PathBuf,

    /// Token file holding the persisted `TokenRecord`
    pub token_path: PathBuf,

    /// Time zone attached to created events
    pub time_zone: Tz,

    /// Calendar that receives new events
    pub calendar_id: String,

    /// Calendar API endpoint
    pub calendar_api_base: String,

    /// `GET /` creates a default event instead of showing the form
    pub auto_create: bool,

    /// Open a browser at startup when no token exists
    pub open_browser: bool,

    /// Ask the provider to show the consent screen on every sign-in
    pub force_consent: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            scopes: vec![DEFAULT_SCOPE.to_string()],
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            time_zone: chrono_tz::Africa::Tunis,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            calendar_api_base: DEFAULT_CALENDAR_API_BASE.to_string(),
            auto_create: false,
            open_browser: true,
            force_consent: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to their defaults. Errors are
    /// collected and reported together; warnings are logged.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        let mut result = ValidationResult::default();

        if let Some(port) = get("PORT") {
            match port.parse::<u16>() {
                Ok(0) => result.add_error("PORT", "Port cannot be 0"),
                Ok(p) => config.port = p,
                Err(_) => result.add_error("PORT", format!("Not a valid port: {}", port)),
            }
        }

        if let Some(scopes) = get("SCOPES") {
            config.scopes = parse_scopes(&scopes);
        }

        if let Some(path) = get("CREDENTIALS_PATH") {
            config.credentials_path = PathBuf::from(path);
        }

        if let Some(path) = get("TOKEN_PATH") {
            config.token_path = PathBuf::from(path);
        }

        if let Some(zone) = get("TIME_ZONE") {
            match zone.parse::<Tz>() {
                Ok(tz) => config.time_zone = tz,
                Err(_) => result.add_error("TIME_ZONE", format!("Unknown time zone: {}", zone)),
            }
        }

        if let Some(id) = get("CALENDAR_ID") {
            config.calendar_id = id;
        }

        if let Some(base) = get("CALENDAR_API_BASE") {
            config.calendar_api_base = base.trim_end_matches('/').to_string();
        }

        config.auto_create = bool_var(get("AUTO_CREATE"), "AUTO_CREATE", config.auto_create, &mut result);
        config.open_browser =
            bool_var(get("OPEN_BROWSER"), "OPEN_BROWSER", config.open_browser, &mut result);
        config.force_consent =
            bool_var(get("FORCE_CONSENT"), "FORCE_CONSENT", config.force_consent, &mut result);

        config.validate_into(&mut result);

        if !result.is_valid() {
            return Err(ConfigError::Invalid(result.error_summary()));
        }

        for warning in &result.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        self.validate_into(&mut result);
        result
    }

    fn validate_into(&self, result: &mut ValidationResult) {
        if self.scopes.is_empty() {
            result.add_error("SCOPES", "At least one scope is required");
        } else if !self.scopes.iter().any(|s| s.contains("calendar")) {
            result.add_warning(
                "SCOPES",
                "No calendar scope requested; event creation will be refused",
            );
        }

        match Url::parse(&self.calendar_api_base) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        "CALENDAR_API_BASE",
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
            }
            Err(e) => {
                result.add_error("CALENDAR_API_BASE", format!("Invalid URL: {}", e));
            }
        }

        if self.calendar_id.is_empty() {
            result.add_error("CALENDAR_ID", "Calendar id cannot be empty");
        }
    }

    /// Root URL of the local server, as opened in the browser.
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// Split a scope list on whitespace or commas.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn bool_var(
    value: Option<String>,
    field: &str,
    default: bool,
    result: &mut ValidationResult,
) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            result.add_warning(
                field,
                format!("Not a boolean: {}, using default {}", value, default),
            );
            default
        }
    }
}
