use serde::{Deserialize, Serialize};
use std::fmt;

/// 威胁类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatCategory {
    SqlInjection,
    Xss,
    DirTraversal,
}

impl ThreatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatCategory::SqlInjection => "SQL_INJECTION",
            ThreatCategory::Xss => "XSS",
            ThreatCategory::DirTraversal => "DIR_TRAVERSAL",
        }
    }
}

impl fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个签名规则：一个类别下的一组有序模式
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SignatureRule {
    pub category: ThreatCategory,
    pub patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SignatureSet {
    pub name: String,
    pub version: String,
    pub signatures: Vec<SignatureRule>,
}
