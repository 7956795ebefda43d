use std::env;

/// Default lifetime of an issued access token (7 days).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Default ceiling for a single uploaded file (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared read-only with every handler through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` in local mode selects the in-memory store.
    pub db_url: Option<String>,
    // S3-compatible storage endpoint URL (MinIO in local).
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_key: String,
    pub s3_secret: String,
    // The bucket used for every upload (images, videos, e-book files).
    pub s3_bucket: String,
    // Public base under which uploaded objects are reachable, without a trailing slash.
    pub s3_public_url: String,
    // Runtime environment marker.
    pub env: Env,
    // HMAC secret used to sign and verify access tokens.
    pub jwt_secret: String,
    // Token lifetime in seconds.
    pub token_ttl_secs: i64,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (in-memory store, MinIO bucket bootstrap) and production infrastructure.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Provides a non-panicking configuration used for test setup.
    fn default() -> Self {
        Self {
            db_url: None,
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_key: "admin".to_string(),
            s3_secret: "password".to_string(),
            s3_bucket: "portal-test".to_string(),
            s3_public_url: "http://localhost:9000/portal-test".to_string(),
            env: Env::Local,
            jwt_secret: "super-secure-test-secret-value-local".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bind_addr: "0.0.0.0:3000".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables.
    ///
    /// # Panics
    /// Panics if a variable required in production (`DATABASE_URL`, `JWT_SECRET`,
    /// `S3_ENDPOINT`, `S3_ACCESS_KEY`, `S3_SECRET_KEY`) is missing, so the service never
    /// starts with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" | "prod" => Env::Production,
            _ => Env::Local,
        };

        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|ttl| *ttl > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        match env {
            Env::Local => {
                let s3_bucket =
                    env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "portal-uploads".to_string());
                let s3_endpoint =
                    env::var("S3_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());
                let s3_public_url = env::var("S3_PUBLIC_URL")
                    .unwrap_or_else(|_| format!("{}/{}", s3_endpoint, s3_bucket));
                Self {
                    env: Env::Local,
                    // An empty DATABASE_URL is treated the same as an unset one.
                    db_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
                    s3_endpoint,
                    s3_region: "us-east-1".to_string(),
                    s3_key: env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "admin".to_string()),
                    s3_secret: env::var("S3_SECRET_KEY")
                        .unwrap_or_else(|_| "password".to_string()),
                    s3_bucket,
                    s3_public_url: s3_public_url.trim_end_matches('/').to_string(),
                    jwt_secret: env::var("JWT_SECRET")
                        .unwrap_or_else(|_| "super-secure-test-secret-value-local".to_string()),
                    token_ttl_secs,
                    bind_addr,
                    max_upload_bytes,
                }
            }
            Env::Production => {
                let s3_endpoint =
                    env::var("S3_ENDPOINT").expect("FATAL: S3_ENDPOINT required in prod");
                let s3_bucket =
                    env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "portal-uploads".to_string());
                let s3_public_url = env::var("S3_PUBLIC_URL")
                    .unwrap_or_else(|_| format!("{}/{}", s3_endpoint, s3_bucket));

                Self {
                    env: Env::Production,
                    db_url: Some(
                        env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod"),
                    ),
                    s3_endpoint,
                    s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                    s3_key: env::var("S3_ACCESS_KEY")
                        .expect("FATAL: S3_ACCESS_KEY required in prod"),
                    s3_secret: env::var("S3_SECRET_KEY")
                        .expect("FATAL: S3_SECRET_KEY required in prod"),
                    s3_bucket,
                    s3_public_url: s3_public_url.trim_end_matches('/').to_string(),
                    jwt_secret: env::var("JWT_SECRET")
                        .expect("FATAL: JWT_SECRET must be set in production."),
                    token_ttl_secs,
                    bind_addr,
                    max_upload_bytes,
                }
            }
        }
    }
}
