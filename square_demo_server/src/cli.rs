//! The server has no command line interface. Any argument prints the help text and the configuration it would run
//! with, and the server exits.
use std::env::{self, VarError};

/// Environment variables the server reads, with a description. Secret values are never printed.
const ENV_VARS: [EnvVar; 11] = [
    EnvVar::new("SQD_APP_ID", "The application id of your Square app."),
    EnvVar::secret("SQD_APP_SECRET", "The application secret of your Square app."),
    EnvVar::new("SQD_API_URL", "Base URL of the Square API. Default: https://connect.squareup.com"),
    EnvVar::new("SQD_HOST", "Address to listen on. Default: 127.0.0.1"),
    EnvVar::new("SQD_PORT", "Port to listen on. Default: 4000"),
    EnvVar::new("SQD_DATA_FILE", "Where the latest results are saved. Default: ./data.json"),
    EnvVar::new("SQD_USE_TUNNEL", "Set to true if the server is exposed through a public tunnel. Default: false"),
    EnvVar::new("SQD_TUNNEL_URL", "The public URL of the tunnel. Used for the OAuth redirect and the app callbacks."),
    EnvVar::new("SQD_CHARGE_AMOUNT", "Amount of the demo charge, in the currency's minor unit. Default: 100"),
    EnvVar::new("SQD_CURRENCY", "Currency of the demo charge. Default: CAD"),
    EnvVar::new("RUST_LOG", "Log filter, e.g. info,square_demo_engine=debug"),
];

struct EnvVar {
    name: &'static str,
    description: &'static str,
    secret: bool,
}

impl EnvVar {
    const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description, secret: false }
    }

    const fn secret(name: &'static str, description: &'static str) -> Self {
        Self { name, description, secret: true }
    }

    fn current_value(&self) -> String {
        match (env::var(self.name), self.secret) {
            (Err(VarError::NotPresent), _) => "Not set".into(),
            (_, true) => "****".into(),
            (Ok(s), false) => s,
            (Err(VarError::NotUnicode(s)), false) => format!("Invalid value: {}", s.to_string_lossy()),
        }
    }
}

/// Prints the help and returns true if any command line arguments were given.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        println!("{}", help_text());
    }
    has_cli_args
}

fn help_text() -> String {
    const README: &str = include_str!("./cli-help.txt");
    let vars = ENV_VARS
        .iter()
        .map(|v| format!("  {:<20} {}\n  {:<20} Current value: {}", v.name, v.description, "", v.current_value()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n{README}\n{vars}\n")
}
