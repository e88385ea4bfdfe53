use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeoLookup, UNKNOWN};
use crate::error::GeoError;

/// ip-api.com 风格的应答体，只取 country 字段
#[derive(Debug, Deserialize)]
struct GeoResponse {
    country: Option<String>,
}

/// 基于 ip-api.com 接口的地理位置客户端
pub struct IpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeoError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoLookup for IpApiClient {
    async fn lookup(&self, ip: &str) -> Result<String, GeoError> {
        let url = format!("{}/{}?fields=country", self.base_url, ip);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }

        let body: GeoResponse = response.json().await?;
        // 应答缺失 country 字段视为成功但未知
        Ok(body.country.unwrap_or_else(|| UNKNOWN.to_string()))
    }
}
