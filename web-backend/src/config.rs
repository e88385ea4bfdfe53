use std::time::Duration;

use anyhow::{Context, Result};

/// 服务配置，全部来自环境变量（支持 .env）
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub geo_base_url: String,
    /// 每次扫描最多解析的去重 IP 数
    pub geo_cap: usize,
    pub geo_timeout: Duration,
    /// 设置后从该目录加载 YAML 签名文件，否则使用内置签名表
    pub signatures_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bind = env_or("LOGLENS_BIND", "0.0.0.0:8000");
        let geo_base_url = env_or("LOGLENS_GEO_BASE_URL", "http://ip-api.com/json");

        let geo_cap = match std::env::var("LOGLENS_GEO_CAP") {
            Ok(value) => value
                .parse()
                .context("LOGLENS_GEO_CAP must be an integer")?,
            Err(_) => 10,
        };

        let timeout_secs: u64 = match std::env::var("LOGLENS_GEO_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .context("LOGLENS_GEO_TIMEOUT_SECS must be an integer")?,
            Err(_) => 5,
        };

        let signatures_dir = std::env::var("LOGLENS_SIGNATURES_DIR").ok();

        Ok(Self {
            bind,
            geo_base_url,
            geo_cap,
            geo_timeout: Duration::from_secs(timeout_secs),
            signatures_dir,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
