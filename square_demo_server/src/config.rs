use std::{env, path::PathBuf};

use log::*;
use sqd_common::parse_boolean_flag;
use square_tools::SquareConfig;

const DEFAULT_SQD_HOST: &str = "127.0.0.1";
const DEFAULT_SQD_PORT: u16 = 4000;
const DEFAULT_DATA_FILE: &str = "./data.json";
const DEFAULT_CHARGE_AMOUNT: i64 = 100;
const DEFAULT_CURRENCY: &str = "CAD";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where the record is persisted.
    pub data_file: PathBuf,
    /// If true, the server is reachable through a public tunnel at `tunnel_url`, and callbacks are addressed there.
    /// The tunnel itself is run separately.
    pub use_tunnel: bool,
    pub tunnel_url: Option<String>,
    pub charge: ChargeConfig,
    pub square: SquareConfig,
}

/// The amount requested by the point-of-sale deep links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeConfig {
    /// In the currency's minor unit, e.g. cents.
    pub amount: i64,
    pub currency: String,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self { amount: DEFAULT_CHARGE_AMOUNT, currency: DEFAULT_CURRENCY.to_string() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SQD_HOST.to_string(),
            port: DEFAULT_SQD_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            use_tunnel: false,
            tunnel_url: None,
            charge: ChargeConfig::default(),
            square: SquareConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SQD_HOST").ok().unwrap_or_else(|| DEFAULT_SQD_HOST.into());
        let port = env::var("SQD_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SQD_PORT. {e} Using the default, {DEFAULT_SQD_PORT}, instead."
                    );
                    DEFAULT_SQD_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SQD_PORT);
        let data_file = env::var("SQD_DATA_FILE").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ SQD_DATA_FILE is not set. Saving results to {DEFAULT_DATA_FILE}.");
            PathBuf::from(DEFAULT_DATA_FILE)
        });
        let use_tunnel = parse_boolean_flag(env::var("SQD_USE_TUNNEL").ok(), false);
        let tunnel_url = env::var("SQD_TUNNEL_URL").ok().filter(|s| !s.trim().is_empty());
        match (use_tunnel, &tunnel_url) {
            (true, None) => warn!(
                "🪛️ SQD_USE_TUNNEL is set, but SQD_TUNNEL_URL is not. Callbacks will be addressed to localhost, which \
                 the point-of-sale app probably cannot reach."
            ),
            (true, Some(url)) => info!("🪛️ Callbacks will be addressed to the tunnel at {url}"),
            (false, Some(_)) => info!("🪛️ SQD_TUNNEL_URL is set but SQD_USE_TUNNEL is not. Ignoring the tunnel."),
            (false, None) => {},
        }
        let charge = configure_charge();
        let square = SquareConfig::new_from_env_or_default();
        Self { host, port, data_file, use_tunnel, tunnel_url, charge, square }
    }

    /// The URL under which Square and the point-of-sale app reach this server: the tunnel when one is configured,
    /// localhost otherwise. It is used as the OAuth redirect URI and as the base of the callback URLs.
    pub fn public_url(&self) -> String {
        match (&self.tunnel_url, self.use_tunnel) {
            (Some(url), true) => url.trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.port),
        }
    }
}

fn configure_charge() -> ChargeConfig {
    let amount = env::var("SQD_CHARGE_AMOUNT")
        .map_err(|_| info!("🪛️ SQD_CHARGE_AMOUNT is not set. Charging {DEFAULT_CHARGE_AMOUNT} by default."))
        .and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for SQD_CHARGE_AMOUNT. {e}"))
                .and_then(|v| {
                    if v > 0 {
                        Ok(v)
                    } else {
                        warn!("🪛️ SQD_CHARGE_AMOUNT must be positive, not {v}.");
                        Err(())
                    }
                })
        })
        .ok()
        .unwrap_or(DEFAULT_CHARGE_AMOUNT);
    let currency = env::var("SQD_CURRENCY")
        .ok()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| s.len() == 3)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    ChargeConfig { amount, currency }
}
