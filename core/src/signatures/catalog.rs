use regex::{Regex, RegexBuilder};

use super::model::{SignatureRule, ThreatCategory};
use crate::error::CatalogError;

/// 编译后的签名
#[derive(Debug)]
pub struct CompiledSignature {
    pub category: ThreatCategory,
    pub pattern: String,
    regex: Regex,
}

impl CompiledSignature {
    fn compile(category: ThreatCategory, pattern: &str) -> Result<Self, CatalogError> {
        // 匹配统一为大小写不敏感
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                category: category.to_string(),
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            category,
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// 签名目录：类别顺序和类别内模式顺序都保持插入序，
/// 构建完成后只读
#[derive(Debug)]
pub struct SignatureCatalog {
    entries: Vec<(ThreatCategory, Vec<CompiledSignature>)>,
}

impl SignatureCatalog {
    /// 内置签名表
    pub fn builtin() -> Self {
        let rules = vec![
            SignatureRule {
                category: ThreatCategory::SqlInjection,
                patterns: vec![
                    r"UNION\s+SELECT".to_string(),
                    r"OR\s+1=1".to_string(),
                    r"'\s*--".to_string(),
                ],
                description: None,
            },
            SignatureRule {
                category: ThreatCategory::Xss,
                patterns: vec![
                    r"<script>".to_string(),
                    r"javascript:".to_string(),
                    r"onload=".to_string(),
                ],
                description: None,
            },
            SignatureRule {
                category: ThreatCategory::DirTraversal,
                patterns: vec![r"\.\./".to_string(), r"/etc/passwd".to_string()],
                description: None,
            },
        ];

        Self::from_rules(rules).expect("built-in signature table must compile")
    }

    /// 从规则列表构建，任一模式编译失败即整体失败
    pub fn from_rules(rules: Vec<SignatureRule>) -> Result<Self, CatalogError> {
        let mut entries: Vec<(ThreatCategory, Vec<CompiledSignature>)> = Vec::new();

        for rule in rules {
            let mut compiled = Vec::with_capacity(rule.patterns.len());
            for pattern in &rule.patterns {
                compiled.push(CompiledSignature::compile(rule.category, pattern)?);
            }

            // 同一类别多次出现时按出现顺序追加
            if let Some((_, signatures)) = entries.iter_mut().find(|(c, _)| *c == rule.category) {
                signatures.extend(compiled);
            } else {
                entries.push((rule.category, compiled));
            }
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThreatCategory, &[CompiledSignature])> {
        self.entries
            .iter()
            .map(|(category, signatures)| (*category, signatures.as_slice()))
    }

    pub fn category_count(&self) -> usize {
        self.entries.len()
    }

    pub fn signature_count(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_compiles() {
        let catalog = SignatureCatalog::builtin();
        assert_eq!(catalog.category_count(), 3);
        assert_eq!(catalog.signature_count(), 8);

        let order: Vec<ThreatCategory> = catalog.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                ThreatCategory::SqlInjection,
                ThreatCategory::Xss,
                ThreatCategory::DirTraversal,
            ]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let catalog = SignatureCatalog::builtin();
        let (_, sql_signatures) = catalog.iter().next().unwrap();
        assert!(sql_signatures[0].is_match("union   select password from users"));
        assert!(sql_signatures[0].is_match("UNION SELECT 1"));
        assert!(!sql_signatures[0].is_match("plain request"));
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let rules = vec![SignatureRule {
            category: ThreatCategory::Xss,
            patterns: vec![r"<script>".to_string(), r"onload=(".to_string()],
            description: None,
        }];

        let err = SignatureCatalog::from_rules(rules).unwrap_err();
        match err {
            crate::error::CatalogError::InvalidPattern { category, pattern, .. } => {
                assert_eq!(category, "XSS");
                assert_eq!(pattern, "onload=(");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_category_appends_in_order() {
        let rules = vec![
            SignatureRule {
                category: ThreatCategory::Xss,
                patterns: vec![r"<script>".to_string()],
                description: None,
            },
            SignatureRule {
                category: ThreatCategory::Xss,
                patterns: vec![r"onerror=".to_string()],
                description: None,
            },
        ];

        let catalog = SignatureCatalog::from_rules(rules).unwrap();
        assert_eq!(catalog.category_count(), 1);

        let (_, signatures) = catalog.iter().next().unwrap();
        let patterns: Vec<&str> = signatures.iter().map(|s| s.pattern.as_str()).collect();
        assert_eq!(patterns, vec![r"<script>", r"onerror="]);
    }
}
