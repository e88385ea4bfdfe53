use std::sync::Arc;

use anyhow::{Context, Result};
use loglens_core::{load_signatures_from_dir, GeoResolver, IpApiClient, SignatureCatalog};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SignatureCatalog>,
    pub resolver: Arc<GeoResolver>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        // 签名目录构建失败是致命错误，不能带着残缺目录启动
        let catalog = match &config.signatures_dir {
            Some(dir) => load_signatures_from_dir(dir)
                .with_context(|| format!("failed to load signatures from {dir}"))?,
            None => SignatureCatalog::builtin(),
        };
        tracing::info!(
            "signature catalog ready: {} patterns in {} categories",
            catalog.signature_count(),
            catalog.category_count()
        );

        let client = IpApiClient::new(&config.geo_base_url, config.geo_timeout)
            .context("failed to build geo lookup client")?;
        let resolver = GeoResolver::new(Arc::new(client), config.geo_cap);

        Ok(Self {
            catalog: Arc::new(catalog),
            resolver: Arc::new(resolver),
        })
    }
}
