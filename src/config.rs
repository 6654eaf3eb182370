use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }

    /// Session cookies are `Secure` everywhere except local development.
    #[must_use]
    pub fn secure_cookies_by_default(&self) -> bool {
        *self != Self::Local
    }
}

/// Credentials for an account created at startup when missing.
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // Upstream APIs
    pub geo_base_url: String,
    pub geo_api_key: String,
    pub timezone_base_url: String,
    pub timezone_api_key: String,
    pub solar_base_url: String,

    // City name normalization, `None` means the built-in table
    pub city_name_replacements: Option<Vec<(String, String)>>,

    // Sessions
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_minutes: i64,
    pub session_cookie_secure: bool,

    // Seeded accounts
    pub admin: SeedAccount,
    pub test_user: SeedAccount,
    pub seed_test_user: bool,

    // API settings
    pub api_host: String,
    pub api_port: u16,
    pub cors_allowed_origins: Vec<String>,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set,
    /// or `ConfigError::Invalid` if `CITY_NAME_REPLACEMENTS` is not a JSON list of pairs.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let deployment =
            Deployment::from_str(&env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()));

        let city_name_replacements = match env::var("CITY_NAME_REPLACEMENTS") {
            Ok(raw) => Some(
                serde_json::from_str::<Vec<(String, String)>>(&raw)
                    .map_err(|e| ConfigError::Invalid("CITY_NAME_REPLACEMENTS", e.to_string()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            // Upstream APIs
            geo_base_url: env::var("GEO_BASE_URL").unwrap_or(defaults.geo_base_url),
            geo_api_key: env::var("GEO_API_KEY").map_err(|_| ConfigError::Missing("GEO_API_KEY"))?,
            timezone_base_url: env::var("TIMEZONE_BASE_URL").unwrap_or(defaults.timezone_base_url),
            timezone_api_key: env::var("TIMEZONE_API_KEY")
                .map_err(|_| ConfigError::Missing("TIMEZONE_API_KEY"))?,
            solar_base_url: env::var("SOLAR_BASE_URL").unwrap_or(defaults.solar_base_url),

            city_name_replacements,

            // Sessions
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or(defaults.jwt_audience),
            jwt_expiry_minutes: env::var("JWT_EXPIRY_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            session_cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_else(|| deployment.secure_cookies_by_default()),

            // Seeded accounts
            admin: SeedAccount {
                email: env::var("ADMIN_EMAIL").unwrap_or(defaults.admin.email),
                username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin.username),
                password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
                city: defaults.admin.city,
            },
            test_user: defaults.test_user,
            seed_test_user: env::var("SEED_TEST_USER")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),

            // API settings
            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),

            // Application metadata
            deployment,
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

/// Local development defaults. Required secrets are placeholders and must be
/// overridden through `from_env` outside of tests.
impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            geo_base_url: "https://api.openweathermap.org".to_string(),
            geo_api_key: String::new(),
            timezone_base_url: "https://api.timezonedb.com".to_string(),
            timezone_api_key: String::new(),
            solar_base_url: "https://api.sunrise-sunset.org".to_string(),
            city_name_replacements: None,
            jwt_secret: "local-development-secret".to_string(),
            jwt_issuer: "solarwatch".to_string(),
            jwt_audience: "solarwatch".to_string(),
            jwt_expiry_minutes: 60,
            session_cookie_secure: false,
            admin: SeedAccount {
                email: "admin@admin.com".to_string(),
                username: "admin".to_string(),
                password: "admin123".to_string(),
                city: "Admin".to_string(),
            },
            // Only seeded when `seed_test_user` is set
            test_user: SeedAccount {
                email: "test@test.com".to_string(),
                username: "test".to_string(),
                password: "test123".to_string(),
                city: "Budapest".to_string(),
            },
            seed_test_user: false,
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            cors_allowed_origins: Vec::new(),
            deployment: Deployment::Local,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
