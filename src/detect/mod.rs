pub mod address;
pub mod mask;
pub mod rules;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DlpError, Result};

use address::AddressHeuristic;
use mask::Masker;
use rules::PatternRuleSet;

/// Categories of structured PII. Declaration order is masking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectionCategory {
    Phone,
    Email,
    Ipv4,
    Ipv6,
    Ssn,
    CreditCard,
    BusinessNumber,
    BankAccount,
    PostalCode,
    MacAddress,
    Address,
}

impl DetectionCategory {
    pub const ALL: [DetectionCategory; 11] = [
        DetectionCategory::Phone,
        DetectionCategory::Email,
        DetectionCategory::Ipv4,
        DetectionCategory::Ipv6,
        DetectionCategory::Ssn,
        DetectionCategory::CreditCard,
        DetectionCategory::BusinessNumber,
        DetectionCategory::BankAccount,
        DetectionCategory::PostalCode,
        DetectionCategory::MacAddress,
        DetectionCategory::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionCategory::Phone => "phone",
            DetectionCategory::Email => "email",
            DetectionCategory::Ipv4 => "ipv4",
            DetectionCategory::Ipv6 => "ipv6",
            DetectionCategory::Ssn => "ssn",
            DetectionCategory::CreditCard => "creditCard",
            DetectionCategory::BusinessNumber => "businessNumber",
            DetectionCategory::BankAccount => "bankAccount",
            DetectionCategory::PostalCode => "postalCode",
            DetectionCategory::MacAddress => "macAddress",
            DetectionCategory::Address => "address",
        }
    }
}

impl std::fmt::Display for DetectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matched substrings per category. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedMap(BTreeMap<DetectionCategory, Vec<String>>);

impl Default for DetectedMap {
    fn default() -> Self {
        Self(
            DetectionCategory::ALL
                .iter()
                .map(|c| (*c, Vec::new()))
                .collect(),
        )
    }
}

impl DetectedMap {
    /// Matches recorded for a category, in order of appearance.
    pub fn get(&self, category: DetectionCategory) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the matches for a category.
    pub fn set(&mut self, category: DetectionCategory, matches: Vec<String>) {
        self.0.insert(category, matches);
    }

    /// True when no category recorded anything.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Iterate categories in masking order.
    pub fn iter(&self) -> impl Iterator<Item = (DetectionCategory, &[String])> {
        self.0.iter().map(|(c, v)| (*c, v.as_slice()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Safe,
    Danger,
}

/// Result of structured analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub masked_text: String,
    pub detected: DetectedMap,
    pub status: Status,
}

/// Regex + heuristic PII detection with masking.
///
/// Every rule runs against the original text. Masking then runs once per
/// category in table order over a single working copy, so a span consumed by
/// an earlier category is no longer visible to a later one.
#[derive(Debug)]
pub struct PatternEngine {
    rules: PatternRuleSet,
    address: AddressHeuristic,
    masker: Masker,
}

impl PatternEngine {
    pub fn new(rules: PatternRuleSet, address: AddressHeuristic, masker: Masker) -> Self {
        Self {
            rules,
            address,
            masker,
        }
    }

    /// Engine with the built-in rule table and address heuristic.
    pub fn default_engine() -> Result<Self> {
        Ok(Self::new(
            PatternRuleSet::default_rules()?,
            AddressHeuristic::new()?,
            Masker::default(),
        ))
    }

    /// Detect and mask structured PII in `text`.
    pub fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        if text.is_empty() {
            return Err(DlpError::InvalidInput {
                reason: "text must be a non-empty string".into(),
            });
        }

        let mut detected = DetectedMap::default();
        for rule in self.rules.rules() {
            let matches: Vec<String> = rule
                .pattern
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect();
            if !matches.is_empty() {
                tracing::debug!("{}: {} match(es)", rule.category, matches.len());
            }
            detected.set(rule.category, matches);
        }
        detected.set(
            DetectionCategory::Address,
            self.address.detect_addresses(text),
        );

        let mut masked_text = text.to_string();
        for (_, matches) in detected.iter() {
            if !matches.is_empty() {
                masked_text = self.masker.mask(&masked_text, matches);
            }
        }

        let status = if detected.is_empty() {
            Status::Safe
        } else {
            Status::Danger
        };

        Ok(AnalysisResult {
            masked_text,
            detected,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_map_has_every_category() {
        let map = DetectedMap::default();
        assert_eq!(map.iter().count(), DetectionCategory::ALL.len());
        assert!(map.is_empty());
    }

    #[test]
    fn test_detected_map_serializes_in_order() {
        let json = serde_json::to_string(&DetectedMap::default()).unwrap();
        assert!(json.starts_with(r#"{"phone":[],"email":[]"#));
        assert!(json.ends_with(r#""macAddress":[],"address":[]}"#));
    }

    #[test]
    fn test_empty_input_rejected() {
        let engine = PatternEngine::default_engine().unwrap();
        let err = engine.analyze("").unwrap_err();
        assert!(matches!(err, DlpError::InvalidInput { .. }));
    }

    #[test]
    fn test_clean_text_is_safe() {
        let engine = PatternEngine::default_engine().unwrap();
        let result = engine.analyze("hello world").unwrap();
        assert_eq!(result.status, Status::Safe);
        assert_eq!(result.masked_text, "hello world");
    }

    #[test]
    fn test_result_field_names() {
        let engine = PatternEngine::default_engine().unwrap();
        let result = engine.analyze("mail a.b@corp.com").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "danger");
        assert_eq!(json["maskedText"], "mail ***");
        assert_eq!(json["detected"]["email"][0], "a.b@corp.com");
    }
}
