use regex::Regex;

use crate::error::{DlpError, Result};

use super::DetectionCategory;

/// ASCII-only word boundary. Hangul counts as a non-word character here.
const B: &str = r"(?-u:\b)";

/// One entry of the ordered rule table.
pub struct PatternRule {
    pub category: DetectionCategory,
    pub pattern: Regex,
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("category", &self.category)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Static table of structured-PII rules. Table order is masking order.
#[derive(Debug)]
pub struct PatternRuleSet {
    rules: Vec<PatternRule>,
}

impl PatternRuleSet {
    /// Build from (category, pattern) pairs.
    pub fn new(patterns: Vec<(DetectionCategory, String)>) -> Result<Self> {
        let rules = patterns
            .into_iter()
            .map(|(category, p)| {
                Regex::new(&p)
                    .map(|pattern| PatternRule { category, pattern })
                    .map_err(|e| DlpError::InvalidConfig {
                        reason: format!("invalid {category} pattern: {e}"),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Default patterns for every category except `address`, in enumeration order.
    pub fn default_patterns() -> Vec<(DetectionCategory, String)> {
        use DetectionCategory::*;
        vec![
            // 0XX-XXXX-XXXX with any separators
            (Phone, format!(r"{B}0[0-9]{{1,2}}[^0-9]*[0-9]{{3,4}}[^0-9]*[0-9]{{4}}{B}")),
            (
                Email,
                format!(r"{B}[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z가-힣]{{2,}}{B}"),
            ),
            (
                Ipv4,
                format!(
                    r"{B}(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){{3}}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?){B}"
                ),
            ),
            (Ipv6, format!(r"{B}(?:[A-Fa-f0-9]{{1,4}}:){{7}}[A-Fa-f0-9]{{1,4}}{B}")),
            // resident registration number
            (Ssn, format!(r"{B}[0-9]{{6}}[^0-9]*[0-9]{{7}}{B}")),
            (CreditCard, format!(r"{B}(?:[0-9]{{4}}[- ]?){{3}}[0-9]{{4}}{B}")),
            (BusinessNumber, format!(r"{B}[0-9]{{3}}[- ]?[0-9]{{2}}[- ]?[0-9]{{5}}{B}")),
            (BankAccount, format!(r"{B}[0-9]{{8,14}}{B}")),
            (PostalCode, format!(r"{B}[0-9]{{5}}{B}")),
            (
                MacAddress,
                format!(r"{B}(?:[0-9A-Fa-f]{{2}}[:-]){{5}}[0-9A-Fa-f]{{2}}{B}"),
            ),
        ]
    }

    /// Default rule set.
    pub fn default_rules() -> Result<Self> {
        Self::new(Self::default_patterns())
    }

    /// Rules in masking order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }
}
