use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub upstream: UpstreamConfig,
    pub views: ViewConfig,
    pub otp: OtpConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// JWT settings shared with the platform API that issues the tokens
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_leeway: Duration,
}

// Keep the secret out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("jwt_leeway", &self.jwt_leeway)
            .finish()
    }
}

/// Platform REST API (source of truth for reports, feedback and OTP)
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

/// In-memory report view settings
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// A cached collection older than this is re-fetched on the next read
    pub ttl: Duration,
    /// Views unused for this long are dropped from memory
    pub idle_eviction: Duration,
}

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub resend_cooldown: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            upstream: UpstreamConfig::from_env()?,
            views: ViewConfig::from_env()?,
            otp: OtpConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AuthConfig {
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "JWT_SECRET environment variable is required".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl UpstreamConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("ZENA_API_BASE_URL")
            .map_err(|_| "ZENA_API_BASE_URL environment variable is required".to_string())?
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs = env::var("ZENA_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "ZENA_API_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

impl ViewConfig {
    const DEFAULT_TTL_SECS: u64 = 30;
    const DEFAULT_IDLE_EVICTION_SECS: u64 = 900;

    pub fn from_env() -> Result<Self, String> {
        let ttl_secs = env::var("VIEW_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "VIEW_TTL_SECS must be a valid number".to_string())?;

        let idle_secs = env::var("VIEW_IDLE_EVICTION_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_EVICTION_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "VIEW_IDLE_EVICTION_SECS must be a valid number".to_string())?;

        Ok(Self {
            ttl: Duration::from_secs(ttl_secs),
            idle_eviction: Duration::from_secs(idle_secs),
        })
    }
}

impl OtpConfig {
    const DEFAULT_RESEND_COOLDOWN_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let cooldown_secs = env::var("OTP_RESEND_COOLDOWN_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_RESEND_COOLDOWN_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "OTP_RESEND_COOLDOWN_SECS must be a valid number".to_string())?;

        if cooldown_secs == 0 {
            return Err("OTP_RESEND_COOLDOWN_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            resend_cooldown: Duration::from_secs(cooldown_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "ZenaNet Gateway API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Report views, status workflow and OTP cooldown for ZenaNet".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
