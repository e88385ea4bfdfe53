use regex::Regex;

use crate::signatures::{SignatureCatalog, ThreatCategory};

/// 单行分类结果
#[derive(Debug, Clone)]
pub struct LineReport {
    pub ip: Option<String>,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone)]
pub struct Hit {
    pub category: ThreatCategory,
    /// 命中的模式原文
    pub pattern: String,
}

pub struct LineClassifier<'a> {
    catalog: &'a SignatureCatalog,
    ip_pattern: Regex,
}

impl<'a> LineClassifier<'a> {
    pub fn new(catalog: &'a SignatureCatalog) -> Self {
        // 点分四段，不校验取值范围
        let ip_pattern = Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").unwrap();
        Self {
            catalog,
            ip_pattern,
        }
    }

    /// 提取行内第一个 IP 形状的子串，并按目录顺序逐类别匹配签名。
    /// 同一类别内第一个命中的模式生效，后续模式不再尝试；
    /// 不同类别互不影响，一行可以同时命中多个类别。
    pub fn classify(&self, line: &str) -> LineReport {
        let ip = self
            .ip_pattern
            .find(line)
            .map(|m| m.as_str().to_string());

        let mut hits = Vec::new();
        for (category, signatures) in self.catalog.iter() {
            if let Some(signature) = signatures.iter().find(|s| s.is_match(line)) {
                hits.push(Hit {
                    category,
                    pattern: signature.pattern.clone(),
                });
            }
        }

        LineReport { ip, hits }
    }
}
