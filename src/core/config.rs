use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub supabase: SupabaseConfig,
    pub auth: AuthConfig,
    pub plant_id: PlantIdConfig,
    pub frontend: FrontendConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Put moderation and subscriber administration behind a bearer token
    pub admin_auth_required: bool,
}

/// Supabase project (PostgREST tables + Storage bucket)
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Service or anon key, sent both as `apikey` and bearer token
    pub key: String,
    /// Storage bucket holding uploaded images
    pub bucket: String,
    /// Declared schema version of the `imagenes` table, `None` means auto-detect
    pub images_schema_version: Option<u8>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
}

// Hand-written so the signing secret never ends up in logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"***")
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .finish()
    }
}

/// PlantNet identification API
#[derive(Clone)]
pub struct PlantIdConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl std::fmt::Debug for PlantIdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantIdConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Non-secret values handed to the web frontend through `/config`
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub api_base_url: String,
    pub environment: String,
    pub supabase_url: Option<String>,
    pub emailjs_service_id: Option<String>,
    pub emailjs_template_id: Option<String>,
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
            supabase: SupabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            plant_id: PlantIdConfig::from_env()?,
            frontend: FrontendConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8002".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let admin_auth_required = parse_bool(
            "ADMIN_AUTH_REQUIRED",
            &env::var("ADMIN_AUTH_REQUIRED").unwrap_or_else(|_| "false".to_string()),
        )?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            admin_auth_required,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SupabaseConfig {
    const DEFAULT_BUCKET: &'static str = "images";

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL environment variable is required".to_string())?
            .trim_end_matches('/')
            .to_string();

        let key = env::var("SUPABASE_KEY")
            .map_err(|_| "SUPABASE_KEY environment variable is required".to_string())?;

        let bucket =
            env::var("SUPABASE_BUCKET").unwrap_or_else(|_| Self::DEFAULT_BUCKET.to_string());

        let images_schema_version = parse_schema_version(
            &env::var("IMAGES_SCHEMA_VERSION").unwrap_or_else(|_| "auto".to_string()),
        )?;

        Ok(Self {
            url,
            key,
            bucket,
            images_schema_version,
        })
    }
}

impl AuthConfig {
    const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let secret_key = env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SECRET_KEY environment variable is required".to_string())?;

        let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| Self::DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES.to_string())
            .parse::<i64>()
            .map_err(|_| "ACCESS_TOKEN_EXPIRE_MINUTES must be a valid number".to_string())?;

        Ok(Self {
            secret_key,
            access_token_expire_minutes,
        })
    }
}

impl PlantIdConfig {
    const DEFAULT_BASE_URL: &'static str = "https://my-api.plantnet.org";

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("PLANT_ID_API_KEY").ok().filter(|s| !s.is_empty());
        let base_url = env::var("PLANTNET_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self { api_key, base_url })
    }
}

impl FrontendConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            environment: env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string()),
            supabase_url: env::var("SUPABASE_URL").ok(),
            emailjs_service_id: env::var("EMAILJS_SERVICE_ID").ok(),
            emailjs_template_id: env::var("EMAILJS_TEMPLATE_ID").ok(),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Cuenca Ubate API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "1.0.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "API para identificación y gestión de plantas de la Cuenca Ubaté".to_string()
        });

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

fn parse_bool(name: &str, raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("{} must be a boolean, got '{}'", name, other)),
    }
}

/// `auto` keeps schema-drift detection, a number pins the `imagenes` contract
fn parse_schema_version(raw: &str) -> Result<Option<u8>, String> {
    match raw.trim() {
        "" | "auto" => Ok(None),
        v => match v.parse::<u8>() {
            Ok(n @ 1..=3) => Ok(Some(n)),
            _ => Err(format!(
                "IMAGES_SCHEMA_VERSION must be 'auto', 1, 2 or 3, got '{}'",
                v
            )),
        },
    }
}
