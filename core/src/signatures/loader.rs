use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::catalog::SignatureCatalog;
use super::model::{SignatureRule, SignatureSet};
use crate::error::CatalogError;

/// 从目录加载 YAML 签名文件并构建目录。
/// 任一文件解析失败或任一模式编译失败都视为致命错误，
/// 不允许静默丢弃类别。
pub fn load_signatures_from_dir<P: AsRef<Path>>(path: P) -> Result<SignatureCatalog, CatalogError> {
    let mut rules = Vec::new();

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(extension) = path.extension() else {
            continue;
        };
        if extension != "yaml" && extension != "yml" {
            continue;
        }

        let content = fs::read_to_string(path)?;

        // 优先按 SignatureSet 解析，失败再按单条规则解析
        if let Ok(set) = serde_yaml::from_str::<SignatureSet>(&content) {
            tracing::info!(
                "loaded signature set `{}` v{} ({} rules) from {}",
                set.name,
                set.version,
                set.signatures.len(),
                path.display()
            );
            rules.extend(set.signatures);
        } else {
            let rule = serde_yaml::from_str::<SignatureRule>(&content).map_err(|e| {
                CatalogError::Parse {
                    file: path.display().to_string(),
                    message: e.to_string(),
                }
            })?;
            rules.push(rule);
        }
    }

    SignatureCatalog::from_rules(rules)
}
