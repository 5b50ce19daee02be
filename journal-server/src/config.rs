//! Environment-driven configuration. Listen address precedence is CLI flag
//! first, then environment variable, then a compiled-in default.

const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

pub struct Config {
    pub listen: String,
}

impl Config {
    pub fn from_env_and_args() -> Self {
        let listen = parse_flag("--listen")
            .or_else(|| std::env::var("JOURNAL_LISTEN").ok())
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());

        if let Ok(url) = std::env::var("JOURNAL_STORE_URL") {
            tracing::warn!(
                store_url = %url,
                "JOURNAL_STORE_URL is set but this build only wires up the in-process document store; no networked backend is connected"
            );
        }

        Config { listen }
    }
}

fn parse_flag(name: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].clone())
}
