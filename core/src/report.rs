// Report module - 报告模块
// 将地理位置映射合并到发现列表，产出最终扫描报告

use std::collections::HashMap;

use serde::Serialize;

use crate::geo::{GeoResolver, UNKNOWN};
use crate::scanner::{scan_lines, Finding};
use crate::signatures::{SignatureCatalog, ThreatCategory};

/// 最终报告中的单条明细
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedFinding {
    #[serde(rename = "type")]
    pub category: ThreatCategory,
    pub line: String,
    pub ip: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub total_lines: usize,
    pub threats_found: usize,
    pub details: Vec<EnrichedFinding>,
}

/// 1:1 合并，保持发现顺序，不过滤不重排。
/// 映射中不存在的 IP（含未提取到 IP 的行）落为 Unknown。
pub fn join_findings(
    findings: Vec<Finding>,
    ip_to_country: &HashMap<String, String>,
) -> Vec<EnrichedFinding> {
    findings
        .into_iter()
        .map(|finding| {
            let ip = finding.ip.unwrap_or_else(|| UNKNOWN.to_string());
            let country = ip_to_country
                .get(&ip)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string());
            EnrichedFinding {
                category: finding.category,
                line: finding.snippet,
                ip,
                country,
            }
        })
        .collect()
}

/// 完整流水线：分类 → 去重解析 → 合并
/// （web-backend 调用的唯一入口）
pub async fn scan_content(
    catalog: &SignatureCatalog,
    resolver: &GeoResolver,
    content: &str,
) -> ScanReport {
    let outcome = scan_lines(catalog, content);
    tracing::info!(
        "scanned {} lines: {} findings, {} distinct ips",
        outcome.total_lines,
        outcome.findings.len(),
        outcome.distinct_ips.len()
    );

    let ip_to_country = resolver.resolve(&outcome.distinct_ips).await;
    let details = join_findings(outcome.findings, &ip_to_country);

    ScanReport {
        total_lines: outcome.total_lines,
        threats_found: details.len(),
        details,
    }
}
