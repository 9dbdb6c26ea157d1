use log::*;
use sqd_common::Secret;

pub const DEFAULT_SQUARE_API_URL: &str = "https://connect.squareup.com";

#[derive(Debug, Clone, Default)]
pub struct SquareConfig {
    /// Base endpoint of the Square API, without a trailing slash.
    pub api_url: String,
    /// The application id. Square calls this the `client_id` in the OAuth flow.
    pub app_id: String,
    pub app_secret: Secret<String>,
}

impl SquareConfig {
    pub fn new(api_url: &str, app_id: &str, app_secret: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            app_secret: Secret::new(app_secret.to_string()),
        }
    }

    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("SQD_API_URL").unwrap_or_else(|_| {
            info!("🪛️ SQD_API_URL not set, using {DEFAULT_SQUARE_API_URL}");
            DEFAULT_SQUARE_API_URL.to_string()
        });
        let app_id = std::env::var("SQD_APP_ID").unwrap_or_else(|_| {
            error!("🪛️ SQD_APP_ID is not set. Please set it to the application id of your Square app.");
            String::default()
        });
        let app_secret = std::env::var("SQD_APP_SECRET").unwrap_or_else(|_| {
            error!("🪛️ SQD_APP_SECRET is not set. Please set it to the application secret of your Square app.");
            String::default()
        });
        Self::new(&api_url, &app_id, &app_secret)
    }
}
