use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_WORKER_THREADS: usize = 4;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.into(), port: 8080, worker_threads: Some(DEFAULT_WORKER_THREADS) }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format `{other}`; expected compact or json")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Admin listener exposing `/healthz` and `/metrics`. Disabled unless configured.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_admin_port")]
    pub port: u16,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { enabled: false, host: DEFAULT_HOST.into(), port: default_admin_port() }
    }
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_server_port() -> u16 { 8080 }
fn default_admin_port() -> u16 { 9091 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to environment
    /// variables when the file is missing, then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    /// Like [`AppConfig::load_and_validate`] with an explicit path. Only a
    /// missing file falls back to the environment; unreadable or malformed
    /// files are errors.
    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("cannot load {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config from `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`,
    /// `LOG_FORMAT`, `ADMIN_ENABLED` and `ADMIN_PORT`.
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok();
        let mut cfg = AppConfig::default();
        if let Some(host) = env("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = env("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = env("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok());
        if let Some(format) = env("LOG_FORMAT").and_then(|f| f.parse::<LogFormat>().ok()) {
            cfg.logging.format = format;
        }
        if let Some(enabled) = env("ADMIN_ENABLED") {
            cfg.admin.enabled = matches!(enabled.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(port) = env("ADMIN_PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.admin.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.admin.normalize();
        if self.admin.enabled {
            if self.admin.port == 0 {
                return Err(anyhow!("admin.port must be within 1..=65535"));
            }
            if self.admin.port == self.server.port && self.admin.host == self.server.host {
                return Err(anyhow!("admin listener must not share server.host:server.port"));
            }
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(DEFAULT_WORKER_THREADS),
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AdminConfig {
    fn normalize(&mut self) {
        if self.host.trim().is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg = parse("").expect("parse empty");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.logging.format, LogFormat::Compact);
        assert!(!cfg.admin.enabled);
    }

    #[test]
    fn parses_all_sections() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 3000
            worker_threads = 2

            [logging]
            format = "json"

            [admin]
            enabled = true
            port = 9100
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:3000");
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert!(cfg.admin.enabled);
        assert_eq!(cfg.admin.bind_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn blank_host_and_zero_threads_are_normalized() {
        let mut cfg = parse("[server]\nhost = \"  \"\nport = 8081\nworker_threads = 0\n").expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = parse("[server]\nport = 0\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn admin_port_clash_is_rejected() {
        let mut cfg = parse("[server]\nport = 9000\n[admin]\nenabled = true\nport = 9000\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("items-api-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).expect("write temp config");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = write_temp("malformed", "[server]\nport = \"not a number\"\n");
        assert!(AppConfig::load_and_validate_from(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn valid_file_is_loaded() {
        let path = write_temp("valid", "[server]\nport = 3100\n");
        let cfg = AppConfig::load_and_validate_from(&path).expect("valid file");
        assert_eq!(cfg.server.port, 3100);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_env() {
        let path = std::env::temp_dir().join("items-api-definitely-missing.toml");
        let path = path.to_string_lossy();
        let err = load_from_file(&path).unwrap_err();
        assert!(is_missing_file(&err));
        assert!(!is_missing_file(&parse("port = [").unwrap_err()));
        assert!(AppConfig::load_and_validate_from(&path).is_ok());
    }

    #[test]
    fn unknown_log_format_fails_to_parse() {
        assert!(parse("[logging]\nformat = \"xml\"\n").is_err());
        assert!("XML".parse::<LogFormat>().is_err());
        assert_eq!(" Json ".parse::<LogFormat>().expect("json"), LogFormat::Json);
    }
}
