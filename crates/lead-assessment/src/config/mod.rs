use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: &str = "3001";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SPREADSHEET_RANGE: &str = "Sheet1!A:P";
const DEFAULT_SUBMISSIONS_CSV: &str = "submissions.csv";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    /// Origin allowed to call the API from a browser.
    pub cors_origin: String,
    /// Overrides the bundled question bank when set.
    pub question_bank_path: Option<PathBuf>,
    pub integrations: IntegrationsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let cors_origin =
            env::var("APP_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let question_bank_path = non_empty_var("QUESTION_BANK_PATH").map(PathBuf::from);

        let integrations = IntegrationsConfig::from_env(environment)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            cors_origin,
            question_bank_path,
            integrations,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// External services used by the intake flow and report export.
#[derive(Debug, Clone, Default)]
pub struct IntegrationsConfig {
    pub sheets: Option<SheetsConfig>,
    pub email: Option<EmailConfig>,
    /// Local fallback store used when Sheets is not configured.
    pub submissions_csv_path: Option<PathBuf>,
    /// Drive folder receiving exported reports.
    pub drive_export_folder_id: Option<String>,
}

impl IntegrationsConfig {
    fn from_env(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let sheets = SheetsConfig::from_env();
        let email = EmailConfig::from_env()?;

        if environment == AppEnvironment::Production {
            if sheets.is_none() {
                return Err(ConfigError::MissingIntegration(
                    "SPREADSHEET_ID, GOOGLE_CLIENT_EMAIL and GOOGLE_PRIVATE_KEY",
                ));
            }
            if email.is_none() {
                return Err(ConfigError::MissingIntegration("EMAIL_USER and EMAIL_PASSWORD"));
            }
        }

        let submissions_csv_path = non_empty_var("SUBMISSIONS_CSV_PATH")
            .map(PathBuf::from)
            .or_else(|| {
                (environment != AppEnvironment::Production)
                    .then(|| PathBuf::from(DEFAULT_SUBMISSIONS_CSV))
            });

        Ok(Self {
            sheets,
            email,
            submissions_csv_path,
            drive_export_folder_id: non_empty_var("DRIVE_EXPORT_FOLDER_ID"),
        })
    }
}

/// Service-account credentials and target range for the submissions sheet.
#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub range: String,
    pub client_email: String,
    pub private_key: String,
}

impl SheetsConfig {
    fn from_env() -> Option<Self> {
        let spreadsheet_id = non_empty_var("SPREADSHEET_ID")?;
        let client_email = non_empty_var("GOOGLE_CLIENT_EMAIL")?;
        let private_key = non_empty_var("GOOGLE_PRIVATE_KEY")?.replace("\\n", "\n");
        let range = non_empty_var("SPREADSHEET_RANGE")
            .unwrap_or_else(|| DEFAULT_SPREADSHEET_RANGE.to_string());

        Some(Self {
            spreadsheet_id,
            range,
            client_email,
            private_key,
        })
    }
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// SMTP account used for confirmation emails.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub username: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(username), Some(password)) =
            (non_empty_var("EMAIL_USER"), non_empty_var("EMAIL_PASSWORD"))
        else {
            return Ok(None);
        };

        let smtp_host =
            non_empty_var("EMAIL_SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let smtp_port = match non_empty_var("EMAIL_SMTP_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidSmtpPort)?,
            None => DEFAULT_SMTP_PORT,
        };
        let from_address = non_empty_var("EMAIL_FROM").unwrap_or_else(|| username.clone());

        Ok(Some(Self {
            username,
            password,
            smtp_host,
            smtp_port,
            from_address,
        }))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidSmtpPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingIntegration(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidSmtpPort => write!(f, "EMAIL_SMTP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingIntegration(vars) => {
                write!(f, "production requires {vars} to be set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSmtpPort
            | ConfigError::MissingIntegration(_) => None,
        }
    }
}
