//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::filter::SortKey;

pub const DEFAULT_BASE_URL: &str = "https://api.swu-db.com";
pub const DEFAULT_CORS_PROXY: &str = "https://api.allorigins.win/get?url=";

/// Star Wars Unlimited card browser and local development proxy.
#[derive(Debug, Parser)]
#[command(name = "swu-card-browser")]
#[command(about = "Browse SWU cards by HP and serve a local card proxy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the local proxy over a JSON dataset.
    Serve(ServeArgs),
    /// Print the HP buckets offered by the card service.
    Catalog(ClientArgs),
    /// Print the cards in one HP bucket.
    Search(SearchArgs),
    /// Pick HP buckets, ranges and sort orders interactively.
    Browse(ClientArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(short, long, env = "SWU_PROXY_LISTEN", default_value = "0.0.0.0:8010")]
    pub listen: String,

    /// json-server style database with `catalog` and `cards` collections.
    #[arg(long, env = "SWU_PROXY_DATASET", default_value = "data/api.json")]
    pub dataset: PathBuf,

    /// Directory served under `/assets`.
    #[arg(long, env = "SWU_PROXY_ASSETS", default_value = "public/assets")]
    pub assets: PathBuf,

    /// Origin allowed by CORS, or `*` for any.
    #[arg(long, env = "SWU_PROXY_CORS_ORIGIN", default_value = "http://localhost:8081")]
    pub cors_origin: String,
}

#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// Base URL of the card service.
    #[arg(long, env = "SWU_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "SWU_API_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Shape of the card service responses.
    #[arg(long, env = "SWU_API_ENVELOPE", value_enum, default_value_t = ResponseEnvelope::Direct)]
    pub envelope: ResponseEnvelope,

    /// CORS proxy prefix used with `--envelope wrapped`.
    #[arg(long, env = "SWU_CORS_PROXY", default_value = DEFAULT_CORS_PROXY)]
    pub cors_proxy: String,

    /// Query parameter carrying the search key (`Catalog` for the local proxy).
    #[arg(long, env = "SWU_SEARCH_PARAM", default_value = "q")]
    pub search_param: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// HP bucket to search.
    pub key: String,

    /// Only keep cards whose HP lies in MIN-MAX (inclusive).
    #[arg(long)]
    pub range: Option<String>,

    #[arg(long, value_enum, default_value_t = SortKey::Name)]
    pub sort: SortKey,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,

    #[command(flatten)]
    pub client: ClientArgs,
}

/// How the card service wraps its JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResponseEnvelope {
    /// `{ "data": [...] }` straight from the service or a local mirror.
    #[default]
    Direct,
    /// `{ "contents": "<json text>" }` as returned by a CORS proxy.
    Wrapped,
}

/// Settings for [`crate::api::CardApi`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub envelope: ResponseEnvelope,
    pub cors_proxy: String,
    pub search_param: String,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_envelope(mut self, envelope: ResponseEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_cors_proxy(mut self, cors_proxy: impl Into<String>) -> Self {
        self.cors_proxy = cors_proxy.into();
        self
    }

    pub fn with_search_param(mut self, param: impl Into<String>) -> Self {
        self.search_param = param.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: Duration::from_secs(10),
            envelope: ResponseEnvelope::Direct,
            cors_proxy: DEFAULT_CORS_PROXY.to_string(),
            search_param: "q".to_string(),
        }
    }
}

impl From<&ClientArgs> for ClientConfig {
    fn from(args: &ClientArgs) -> Self {
        ClientConfig::new(args.base_url.clone())
            .with_timeout(Duration::from_millis(args.timeout_ms))
            .with_envelope(args.envelope)
            .with_cors_proxy(args.cors_proxy.clone())
            .with_search_param(args.search_param.clone())
    }
}

/// Settings for the local proxy.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub listen_addr: String,
    pub dataset_path: PathBuf,
    pub assets_dir: PathBuf,
    pub cors_origin: String,
}

impl From<&ServeArgs> for ProxyConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            dataset_path: args.dataset.clone(),
            assets_dir: args.assets.clone(),
            cors_origin: args.cors_origin.clone(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8010".to_string(),
            dataset_path: PathBuf::from("data/api.json"),
            assets_dir: PathBuf::from("public/assets"),
            cors_origin: "http://localhost:8081".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_command_parses_client_flags() {
        let cli = Cli::parse_from([
            "swu-card-browser",
            "search",
            "5",
            "--range",
            "2-8",
            "--sort",
            "cost",
            "--desc",
            "--base-url",
            "http://localhost:8010",
            "--envelope",
            "wrapped",
            "--timeout-ms",
            "2500",
        ]);

        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.key, "5");
        assert_eq!(args.range.as_deref(), Some("2-8"));
        assert_eq!(args.sort, SortKey::Cost);
        assert!(args.desc);

        let config = ClientConfig::from(&args.client);
        assert_eq!(config.base_url.as_str(), "http://localhost:8010/");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.envelope, ResponseEnvelope::Wrapped);
        assert_eq!(config.search_param, "q");
    }

    #[test]
    fn client_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "https://api.swu-db.com/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.envelope, ResponseEnvelope::Direct);
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::parse_from(["swu-card-browser", "serve"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        let config = ProxyConfig::from(&args);
        assert_eq!(config.listen_addr, "0.0.0.0:8010");
        assert_eq!(config.dataset_path, PathBuf::from("data/api.json"));
        assert_eq!(config.cors_origin, "http://localhost:8081");
    }
}
