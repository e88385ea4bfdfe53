use std::collections::HashSet;

use super::classifier::LineClassifier;
use super::{Finding, SNIPPET_MAX_LEN};
use crate::signatures::SignatureCatalog;

/// 一次扫描的中间结果
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub total_lines: usize,
    pub findings: Vec<Finding>,
    /// 所有命中行上提取到的源 IP，去重
    pub distinct_ips: HashSet<String>,
}

/// 按输入顺序扫描全部行。分类不会失败，
/// 空行或无法解析的行只是贡献零命中。
pub fn scan_lines(catalog: &SignatureCatalog, content: &str) -> ScanOutcome {
    let classifier = LineClassifier::new(catalog);
    let mut outcome = ScanOutcome::default();

    for line in content.lines() {
        outcome.total_lines += 1;

        let report = classifier.classify(line);
        if report.hits.is_empty() {
            continue;
        }

        if let Some(ip) = &report.ip {
            outcome.distinct_ips.insert(ip.clone());
        }

        for hit in report.hits {
            tracing::debug!(
                "line {}: {} via `{}`",
                outcome.total_lines,
                hit.category,
                hit.pattern
            );
            outcome.findings.push(Finding {
                category: hit.category,
                snippet: truncate_snippet(line),
                ip: report.ip.clone(),
            });
        }
    }

    outcome
}

fn truncate_snippet(line: &str) -> String {
    line.chars().take(SNIPPET_MAX_LEN).collect()
}
