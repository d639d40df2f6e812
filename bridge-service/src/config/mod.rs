use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Gradio prediction endpoint of the hosted photo analyzer.
pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://pororoororoq-photo-analyzer.hf.space/api/predict";

/// Bounds for the outbound call timeout, in seconds.
pub const MIN_REMOTE_TIMEOUT_SECS: u64 = 30;
pub const MAX_REMOTE_TIMEOUT_SECS: u64 = 45;

const DEFAULT_HEALTH_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub remote: RemoteConfig,
    pub policy: FailurePolicy,
    pub http: HttpConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    /// Bound on a single prediction call.
    pub timeout: Duration,
    /// Bound on the reachability probe behind `GET /analyze`.
    pub health_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub max_body_bytes: usize,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

/// What the bridge returns when the remote service cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Surface the failure as `503 Service Unavailable`.
    Strict,
    /// Answer `200` with synthetic scores marked `ml_source: "fallback"`.
    Fallback,
}

impl FailurePolicy {
    pub fn from_strict_flag(strict_remote: bool) -> Self {
        if strict_remote {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Fallback
        }
    }
}

impl BridgeConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let timeout_secs = parse_number(
            "REMOTE_TIMEOUT_SECS",
            &get_env("REMOTE_TIMEOUT_SECS", Some("30"), false)?,
        )?;
        let health_timeout_secs = parse_number(
            "REMOTE_HEALTH_TIMEOUT_SECS",
            &get_env(
                "REMOTE_HEALTH_TIMEOUT_SECS",
                Some(&DEFAULT_HEALTH_PROBE_TIMEOUT_SECS.to_string()),
                false,
            )?,
        )?;
        let strict_remote = parse_bool(
            "STRICT_REMOTE",
            &get_env("STRICT_REMOTE", Some("true"), is_prod)?,
        )?;

        Ok(BridgeConfig {
            common: common_config,
            service_name: get_env("SERVICE_NAME", Some("bridge"), false)?,
            remote: RemoteConfig {
                endpoint: get_env("REMOTE_ENDPOINT", Some(DEFAULT_REMOTE_ENDPOINT), is_prod)?,
                timeout: Duration::from_secs(clamp_remote_timeout(timeout_secs)),
                health_timeout: Duration::from_secs(health_timeout_secs),
            },
            policy: FailurePolicy::from_strict_flag(strict_remote),
            http: HttpConfig {
                max_body_bytes: parse_number(
                    "MAX_BODY_BYTES",
                    &get_env(
                        "MAX_BODY_BYTES",
                        Some(&DEFAULT_MAX_BODY_BYTES.to_string()),
                        false,
                    )?,
                )?,
                allowed_origins: parse_list(&get_env("CORS_ALLOWED_ORIGINS", Some("*"), false)?),
            },
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }
}

/// Keeps the prediction timeout inside the supported window.
pub fn clamp_remote_timeout(secs: u64) -> u64 {
    secs.clamp(MIN_REMOTE_TIMEOUT_SECS, MAX_REMOTE_TIMEOUT_SECS)
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a boolean, got '{}'",
            key,
            other
        ))),
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} must be a number: {}", key, e))
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
