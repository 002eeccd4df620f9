use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use lettre::message::Mailbox;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "mailcamp";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub delivery: DeliveryConfig,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    pub backend: DeliveryBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryBackend {
    #[default]
    Smtp,
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub from: String,
    pub username: Option<String>,
    pub password_env: Option<String>,
    pub tls: SmtpTls,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    None,
    #[default]
    StartTls,
    Tls,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid smtp.{field}: {reason}")]
    InvalidSmtpField { field: &'static str, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    delivery: Option<DeliveryFile>,
    smtp: Option<SmtpFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeliveryFile {
    backend: Option<DeliveryBackend>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SmtpFile {
    host: Option<String>,
    port: Option<u16>,
    from: Option<String>,
    username: Option<String>,
    password_env: Option<String>,
    tls: Option<SmtpTls>,
    timeout_seconds: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    Ok(load_at_path(&path, required)?.unwrap_or_default())
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = custom {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfigPath(path));
        }
        return Ok(path);
    }

    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => {
            let path = PathBuf::from(dir);
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            path
        }
        None => dirs::home_dir()
            .ok_or(ConfigError::MissingHomeDir)?
            .join(".config"),
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(backend) = parsed.delivery.and_then(|delivery| delivery.backend) {
        config.delivery.backend = backend;
    }
    if let Some(smtp) = parsed.smtp {
        config.smtp = Some(validate_smtp(smtp)?);
    }

    Ok(config)
}

fn validate_smtp(file: SmtpFile) -> Result<SmtpConfig> {
    let host = required_text(file.host, "host")?;
    let from = required_text(file.from, "from")?;
    from.parse::<Mailbox>()
        .map_err(|err| ConfigError::InvalidSmtpField {
            field: "from",
            reason: err.to_string(),
        })?;

    if file.port == Some(0) {
        return Err(ConfigError::InvalidSmtpField {
            field: "port",
            reason: "must be between 1 and 65535".to_string(),
        });
    }
    if file.timeout_seconds == Some(0) {
        return Err(ConfigError::InvalidSmtpField {
            field: "timeout_seconds",
            reason: "must be positive".to_string(),
        });
    }

    let username = optional_text(file.username);
    let password_env = optional_text(file.password_env);
    if password_env.is_some() && username.is_none() {
        return Err(ConfigError::InvalidSmtpField {
            field: "username",
            reason: "required when password_env is set".to_string(),
        });
    }
    if username.is_some() && password_env.is_none() {
        return Err(ConfigError::InvalidSmtpField {
            field: "password_env",
            reason: "required when username is set".to_string(),
        });
    }

    Ok(SmtpConfig {
        host,
        port: file.port,
        from,
        username,
        password_env,
        tls: file.tls.unwrap_or_default(),
        timeout_seconds: file.timeout_seconds,
    })
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String> {
    optional_text(value).ok_or_else(|| ConfigError::InvalidSmtpField {
        field,
        reason: "is required".to_string(),
    })
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.permissions().mode() & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
