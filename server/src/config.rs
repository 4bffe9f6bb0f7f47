use anyhow::{anyhow, Error, Result};
use figment::{
    providers::{Env, Format, Toml, Yaml},
    Figment,
};
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::string::ToString;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

const DEFAULT_CONFIG_PATH: &str = "/etc/rev/config.toml";
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PARTNER_URL: &str = "http://localhost:8082";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub log: Option<String>,
    #[serde(default)]
    pub server: Server,
    pub partner: Partner,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Server {
    #[serde(default = "addr_default")]
    pub addr: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            addr: addr_default(),
        }
    }
}

fn addr_default() -> String {
    DEFAULT_SERVER_ADDR.to_string()
}

#[derive(Deserialize, Clone)]
pub struct Partner {
    #[serde(default = "partner_url_default")]
    pub url: String,
    pub token: String,
}

fn partner_url_default() -> String {
    DEFAULT_PARTNER_URL.to_string()
}

impl std::fmt::Debug for Partner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partner")
            .field("url", &self.url)
            .field("token", &"***")
            .finish()
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self, Error> {
        let path = path.unwrap_or(PathBuf::from(DEFAULT_CONFIG_PATH));
        let figment = Figment::new();
        let figment = match path.extension().and_then(OsStr::to_str) {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
            Some(ext) => return Err(anyhow!("unexpected file extension '{}'", ext)),
            None => return Err(anyhow!("failed to parse path")),
        };

        let config: Config = figment.join(Env::prefixed("REV_").split("_")).extract()?;
        Ok(config)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self
            .log
            .to_owned()
            .unwrap_or_else(|| "INFO".to_string())
            .to_uppercase()
            .as_str()
        {
            "TRACE" => LevelFilter::TRACE,
            "DEBUG" => LevelFilter::DEBUG,
            "WARN" => LevelFilter::WARN,
            "ERROR" => LevelFilter::ERROR,
            "INFO" => LevelFilter::INFO,
            _ => LevelFilter::INFO,
        }
    }

    /// Configured level as the default directive, refined by `RUST_LOG`.
    pub fn log_filter(&self) -> EnvFilter {
        let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
        log_filter_from(self.log_level(), &directives)
    }
}

fn log_filter_from(level: LevelFilter, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}
