use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields except the geocoder API key have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory where uploaded photos are stored.
    pub file_upload_path: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_file_upload: u64,
    /// Base URL of the geocoding provider.
    pub geocoder_url: String,
    /// API key for the geocoding provider. Geocoding requests fail
    /// upstream when this is unset.
    pub geocoder_api_key: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                            |
    /// |------------------------|----------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                          |
    /// | `PORT`                 | `3000`                                             |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                            |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                               |
    /// | `FILE_UPLOAD_PATH`     | `./public/uploads`                                 |
    /// | `MAX_FILE_UPLOAD`      | `1000000`                                          |
    /// | `GEOCODER_URL`         | `https://www.mapquestapi.com/geocoding/v1/address` |
    /// | `GEOCODER_API_KEY`     | (empty)                                            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let file_upload_path =
            PathBuf::from(std::env::var("FILE_UPLOAD_PATH").unwrap_or_else(|_| {
                "./public/uploads".into()
            }));

        let max_file_upload: u64 = std::env::var("MAX_FILE_UPLOAD")
            .unwrap_or_else(|_| "1000000".into())
            .parse()
            .expect("MAX_FILE_UPLOAD must be a valid u64");

        let geocoder_url = std::env::var("GEOCODER_URL")
            .unwrap_or_else(|_| "https://www.mapquestapi.com/geocoding/v1/address".into());

        let geocoder_api_key = std::env::var("GEOCODER_API_KEY").unwrap_or_default();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            file_upload_path,
            max_file_upload,
            geocoder_url,
            geocoder_api_key,
        }
    }
}
