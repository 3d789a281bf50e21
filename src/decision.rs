use serde::{Deserialize, Serialize};

/// Enforcement action rendered by the similarity engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Allow,
    HoldForReview,
    Block,
}

/// Risk band for a single neighbor similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Safe,
    Danger,
    Critical,
}

/// Similarity cut-offs separating the risk bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    /// Lower bound (inclusive) of the danger band.
    pub danger: f32,
    /// Lower bound (inclusive) of the critical band.
    pub critical: f32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            danger: 0.80,
            critical: 0.85,
        }
    }
}

impl RiskThresholds {
    /// Bucket a similarity into its band.
    pub fn classify(&self, similarity: f32) -> RiskBand {
        if similarity >= self.critical {
            RiskBand::Critical
        } else if similarity >= self.danger {
            RiskBand::Danger
        } else {
            RiskBand::Safe
        }
    }

    /// The action implied by the highest neighbor similarity.
    /// `None` (no neighbors) allows.
    pub fn action_for(&self, max_similarity: Option<f32>) -> Action {
        match max_similarity.map(|s| self.classify(s)) {
            Some(RiskBand::Critical) => Action::Block,
            Some(RiskBand::Danger) => Action::HoldForReview,
            Some(RiskBand::Safe) | None => Action::Allow,
        }
    }
}

/// A reported neighbor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborMatch {
    /// Path of the indexed document.
    pub file: String,

    /// Risk band of the similarity.
    pub band: RiskBand,

    /// Raw inner-product similarity.
    pub score: f32,
}

/// Outcome of a similarity decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub action: Action,

    /// Neighbors in the danger or critical band, nearest first.
    pub matches: Vec<NeighborMatch>,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Allow => write!(f, "ALLOW"),
            Action::HoldForReview => write!(f, "HOLD_FOR_REVIEW"),
            Action::Block => write!(f, "BLOCK"),
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskBand::Safe => write!(f, "safe"),
            RiskBand::Danger => write!(f, "danger"),
            RiskBand::Critical => write!(f, "critical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(0.79), RiskBand::Safe);
        assert_eq!(t.classify(0.80), RiskBand::Danger);
        assert_eq!(t.classify(0.849), RiskBand::Danger);
        assert_eq!(t.classify(0.85), RiskBand::Critical);
        assert_eq!(t.classify(1.0), RiskBand::Critical);
    }

    #[test]
    fn test_action_for_empty_is_allow() {
        let t = RiskThresholds::default();
        assert_eq!(t.action_for(None), Action::Allow);
        assert_eq!(t.action_for(Some(0.82)), Action::HoldForReview);
        assert_eq!(t.action_for(Some(0.9)), Action::Block);
    }

    #[test]
    fn test_action_serializes_upper_snake() {
        let json = serde_json::to_string(&Action::HoldForReview).unwrap();
        assert_eq!(json, "\"HOLD_FOR_REVIEW\"");
        assert_eq!(Action::Block.to_string(), "BLOCK");
    }
}
