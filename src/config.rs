use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

// =========================================================
// 客户端配置 (Client Configuration)
// =========================================================

/// 这些是默认值，如果环境中没有定义，则使用这些值
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;

pub const ENV_API_URL: &str = "PRESSROOM_API_URL";
pub const ENV_REFRESH_INTERVAL: &str = "PRESSROOM_REFRESH_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API 根地址，不带结尾的 `/`
    pub api_url: String,
    /// 主动刷新 access token 的间隔，0 表示关闭
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: &str) -> ApiResult<Self> {
        Ok(Self {
            api_url: normalize_url(api_url)?,
            ..Self::default()
        })
    }

    pub fn with_refresh_interval(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    /// 从进程环境变量读取
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意来源按键名读取，读不到就用默认值
    ///
    /// 前端在编译期通过 `option_env!` 提供这些值。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let api_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let refresh_interval_secs = match lookup(ENV_REFRESH_INTERVAL) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ApiError::config(format!("{} must be a number of seconds", ENV_REFRESH_INTERVAL))
                    .with_source(e)
            })?,
            None => DEFAULT_REFRESH_INTERVAL_SECS,
        };

        Ok(Self {
            api_url: normalize_url(&api_url)?,
            refresh_interval_secs,
        })
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

fn normalize_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ApiError::config(format!("invalid API URL `{}`", raw)).with_source(e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::config(format!(
            "API URL must use http or https, got `{}`",
            parsed.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(config.api_url, "https://api.example.com/v1");
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_rejects_invalid_urls() {
        assert_eq!(ClientConfig::new("not a url").unwrap_err().kind, ErrorKind::Config);
        assert_eq!(ClientConfig::new("ftp://host").unwrap_err().kind, ErrorKind::Config);
    }

    #[test]
    fn test_lookup_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "https://blog.example.com/"),
            (ENV_REFRESH_INTERVAL, "0"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_url, "https://blog.example.com");
        assert_eq!(config.refresh_interval(), None);
    }

    #[test]
    fn test_refresh_interval_override() {
        let config = ClientConfig::default().with_refresh_interval(30);
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.with_refresh_interval(0).refresh_interval(), None);
    }

    // 本模块中只有这个测试读写进程环境变量
    #[test]
    fn test_from_env_reads_process_environment() {
        unsafe {
            std::env::set_var(ENV_API_URL, "https://env.example.com/api/");
            std::env::set_var(ENV_REFRESH_INTERVAL, "45");
        }
        let config = ClientConfig::from_env();
        unsafe {
            std::env::remove_var(ENV_API_URL);
            std::env::remove_var(ENV_REFRESH_INTERVAL);
        }

        let config = config.unwrap();
        assert_eq!(config.api_url, "https://env.example.com/api");
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_bad_interval_is_config_error() {
        let err = ClientConfig::from_lookup(|k| {
            (k == ENV_REFRESH_INTERVAL).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
    }
}
