// loglens Core Library
// 核心功能库，包含签名目录、行分类器、地理位置解析和报告合并

mod geo;
mod report;
mod scanner;
mod signatures;

// 重新导出常用类型
pub use geo::{GeoLookup, GeoResolver, IpApiClient, UNKNOWN};
pub use report::{join_findings, scan_content, EnrichedFinding, ScanReport};
pub use scanner::{scan_lines, Finding, Hit, LineClassifier, LineReport, ScanOutcome};

// 签名系统
pub use signatures::{
    load_signatures_from_dir, SignatureCatalog, SignatureRule, SignatureSet, ThreatCategory,
};

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CatalogError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Failed to parse signature file {file}: {message}")]
        Parse { file: String, message: String },

        #[error("Invalid pattern `{pattern}` for category {category}: {source}")]
        InvalidPattern {
            category: String,
            pattern: String,
            #[source]
            source: regex::Error,
        },
    }

    #[derive(Error, Debug)]
    pub enum GeoError {
        #[error("Request error: {0}")]
        Http(#[from] reqwest::Error),

        #[error("Lookup service returned status {0}")]
        Status(u16),
    }
}
