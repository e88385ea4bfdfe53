// Geo module - 地理位置解析模块
// 将去重后的 IP 集合解析为国家名，容忍单个查询失败

pub mod ip_api;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::error::GeoError;

pub use ip_api::IpApiClient;

/// 无法解析时使用的哨兵值
pub const UNKNOWN: &str = "Unknown";

/// 外部地理位置查询接口
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Result<String, GeoError>;
}

pub struct GeoResolver {
    lookup: Arc<dyn GeoLookup>,
    cap: usize,
}

impl GeoResolver {
    pub fn new(lookup: Arc<dyn GeoLookup>, cap: usize) -> Self {
        Self { lookup, cap }
    }

    /// 解析至多 `cap` 个 IP，每个 IP 只查询一次。
    /// 超出上限的 IP 不出现在返回映射中；选择哪一部分不做承诺，
    /// 只保证对给定集合迭代顺序是确定的。
    /// 单个查询失败降级为 Unknown，不影响同批其它查询。
    pub async fn resolve(&self, ips: &HashSet<String>) -> HashMap<String, String> {
        let mut set = JoinSet::new();

        for ip in ips.iter().take(self.cap) {
            let lookup = Arc::clone(&self.lookup);
            let ip = ip.clone();

            set.spawn(async move {
                let country = match lookup.lookup(&ip).await {
                    Ok(country) => country,
                    Err(e) => {
                        tracing::warn!("geo lookup failed for {}: {}", ip, e);
                        UNKNOWN.to_string()
                    }
                };
                (ip, country)
            });
        }

        let mut resolved = HashMap::new();
        while let Some(res) = set.join_next().await {
            if let Ok((ip, country)) = res {
                resolved.insert(ip, country);
            }
        }

        tracing::info!("resolved {} of {} distinct ips", resolved.len(), ips.len());
        resolved
    }
}

/// 离线测试替身：固定应答 + 指定失败集合 + 调用计数
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) struct StaticGeoLookup {
        countries: HashMap<String, String>,
        failures: HashSet<String>,
        calls: AtomicUsize,
    }

    impl StaticGeoLookup {
        pub(crate) fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                countries: entries
                    .iter()
                    .map(|(ip, country)| (ip.to_string(), country.to_string()))
                    .collect(),
                failures: HashSet::new(),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing_for(mut self, ips: &[&str]) -> Self {
            self.failures = ips.iter().map(|ip| ip.to_string()).collect();
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeoLookup for StaticGeoLookup {
        async fn lookup(&self, ip: &str) -> Result<String, GeoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failures.contains(ip) {
                return Err(GeoError::Status(500));
            }
            Ok(self
                .countries
                .get(ip)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticGeoLookup;
    use super::*;

    fn ip_set(ips: &[&str]) -> HashSet<String> {
        ips.iter().map(|ip| ip.to_string()).collect()
    }

    #[tokio::test]
    async fn resolves_each_ip_exactly_once() {
        let lookup = Arc::new(StaticGeoLookup::new(&[
            ("203.0.113.5", "Testland"),
            ("198.51.100.7", "Examplestan"),
        ]));
        let resolver = GeoResolver::new(lookup.clone(), 10);

        let resolved = resolver
            .resolve(&ip_set(&["203.0.113.5", "198.51.100.7"]))
            .await;

        assert_eq!(lookup.call_count(), 2);
        assert_eq!(resolved["203.0.113.5"], "Testland");
        assert_eq!(resolved["198.51.100.7"], "Examplestan");
    }

    #[tokio::test]
    async fn cap_bounds_lookup_volume() {
        let lookup = Arc::new(StaticGeoLookup::new(&[]));
        let resolver = GeoResolver::new(lookup.clone(), 10);

        let ips: HashSet<String> = (0..15).map(|i| format!("10.0.0.{i}")).collect();
        let resolved = resolver.resolve(&ips).await;

        assert_eq!(lookup.call_count(), 10);
        assert_eq!(resolved.len(), 10);
        for ip in resolved.keys() {
            assert!(ips.contains(ip));
        }
    }

    #[tokio::test]
    async fn failure_does_not_abort_siblings() {
        let lookup = Arc::new(
            StaticGeoLookup::new(&[("198.51.100.7", "Examplestan")])
                .failing_for(&["203.0.113.5"]),
        );
        let resolver = GeoResolver::new(lookup, 10);

        let resolved = resolver
            .resolve(&ip_set(&["203.0.113.5", "198.51.100.7"]))
            .await;

        assert_eq!(resolved["203.0.113.5"], UNKNOWN);
        assert_eq!(resolved["198.51.100.7"], "Examplestan");
    }

    #[tokio::test]
    async fn empty_set_makes_no_calls() {
        let lookup = Arc::new(StaticGeoLookup::new(&[]));
        let resolver = GeoResolver::new(lookup.clone(), 10);

        let resolved = resolver.resolve(&HashSet::new()).await;

        assert!(resolved.is_empty());
        assert_eq!(lookup.call_count(), 0);
    }
}
