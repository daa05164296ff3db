use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::features::files::content_type::EXTENSION_MIME_TYPES;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
    pub preview: PreviewConfig,
    pub password: PasswordConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Settings for validating bearer tokens minted by the external issuer
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 secret shared with the token issuer
    pub jwt_secret: String,
    /// Expected `iss` claim, validated only when set
    pub issuer: Option<String>,
    pub jwt_leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Local disk storage and quota configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory; each user gets a `<base>/<user_id>` subdirectory
    pub base_directory: PathBuf,
    /// Largest single upload accepted, in bytes
    pub max_file_size_bytes: u64,
    /// Per-account quota used for usage reporting, in bytes
    pub max_storage_bytes: u64,
    /// Extensions advertised to clients as supported
    pub supported_formats: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordConfig {
    /// Appended to every password before hashing and verification
    pub pepper: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub default_users: bool,
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
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            preview: PreviewConfig::from_env()?,
            password: PasswordConfig::from_env(),
            seed: SeedConfig::from_env()?,
        })
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(format!("{} must be a boolean (true/false)", name)),
        },
        Err(_) => Ok(default),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins =
            parse_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

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

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DATABASE_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DATABASE_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DATABASE_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DATABASE_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DATABASE_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DATABASE_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DATABASE_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "JWT_SECRET environment variable is required".to_string())?;

        let issuer = env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty());

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            issuer,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "pCloud API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "File storage API: uploads, downloads, profile and settings".to_string());

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

impl StorageConfig {
    const DEFAULT_BASE_DIRECTORY: &'static str = "./data/files";
    const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024; // 100 MiB
    const DEFAULT_MAX_STORAGE_BYTES: u64 = 5 * 1024 * 1024 * 1024; // 5 GiB

    pub fn from_env() -> Result<Self, String> {
        let base_directory = PathBuf::from(
            env::var("STORAGE_BASE_DIRECTORY")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_DIRECTORY.to_string()),
        );

        let max_file_size_bytes = env::var("STORAGE_MAX_FILE_SIZE_BYTES")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_FILE_SIZE_BYTES.to_string())
            .parse::<u64>()
            .map_err(|_| "STORAGE_MAX_FILE_SIZE_BYTES must be a valid number".to_string())?;

        let max_storage_bytes = env::var("STORAGE_MAX_STORAGE_BYTES")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_STORAGE_BYTES.to_string())
            .parse::<u64>()
            .map_err(|_| "STORAGE_MAX_STORAGE_BYTES must be a valid number".to_string())?;

        let supported_formats = match env::var("STORAGE_SUPPORTED_FORMATS") {
            Ok(value) => parse_list(&value),
            Err(_) => Self::default_supported_formats(),
        };

        Ok(Self {
            base_directory,
            max_file_size_bytes,
            max_storage_bytes,
            supported_formats,
        })
    }

    /// Every extension the content-type resolver knows about
    pub fn default_supported_formats() -> Vec<String> {
        EXTENSION_MIME_TYPES
            .iter()
            .map(|(ext, _)| ext.to_string())
            .collect()
    }
}

impl PreviewConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            enabled: parse_bool("PREVIEW_ENABLED", false)?,
        })
    }
}

impl PasswordConfig {
    pub fn from_env() -> Self {
        Self {
            pepper: env::var("PASSWORD_PEPPER").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl SeedConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            default_users: parse_bool("SEED_DEFAULT_USERS", false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_skips_empty() {
        assert_eq!(
            parse_list(" jpg, png ,,pdf "),
            vec!["jpg".to_string(), "png".to_string(), "pdf".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_default_supported_formats_cover_resolver_table() {
        let formats = StorageConfig::default_supported_formats();
        assert!(formats.iter().any(|f| f == "jpg"));
        assert!(formats.iter().any(|f| f == "pdf"));
        assert_eq!(formats.len(), EXTENSION_MIME_TYPES.len());
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("docs".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert!(swagger.credentials().is_none());

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials().as_deref(), Some("docs:secret"));
    }
}
