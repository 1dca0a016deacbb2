//! Risk assessment types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rockfall risk category, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    /// All categories in severity order (also the model class order)
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Low,
        RiskCategory::Medium,
        RiskCategory::High,
        RiskCategory::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
            RiskCategory::Critical => "Critical",
        }
    }

    /// Lowercase form used for dashboard alert levels
    pub fn alert_level(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
            RiskCategory::Critical => "critical",
        }
    }

    pub fn from_index(index: usize) -> Option<RiskCategory> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category probability breakdown in percent.
///
/// The four values are independently smoothed curves, not a normalized
/// distribution; they need not sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryBreakdown {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

/// A completed risk assessment. Created fresh per request, immutable once
/// returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_category: RiskCategory,
    /// Probability percentage; the formula scorer keeps it inside [5, 95]
    pub risk_probability: f64,
    /// Confidence percentage; the formula scorer keeps it inside [75, 95]
    pub confidence: f64,
    pub prediction_time: DateTime<Utc>,
    pub category_probabilities: CategoryBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ordering() {
        assert!(RiskCategory::Low < RiskCategory::Medium);
        assert!(RiskCategory::Medium < RiskCategory::High);
        assert!(RiskCategory::High < RiskCategory::Critical);
    }

    #[test]
    fn test_category_serializes_capitalized() {
        let json = serde_json::to_string(&RiskCategory::High).unwrap();
        assert_eq!(json, "\"High\"");

        let back: RiskCategory = serde_json::from_str("\"Critical\"").unwrap();
        assert_eq!(back, RiskCategory::Critical);
    }

    #[test]
    fn test_breakdown_keys_are_pascal_case() {
        let breakdown = CategoryBreakdown {
            low: 25.0,
            medium: 45.0,
            high: 25.0,
            critical: 5.0,
        };
        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["Low"], 25.0);
        assert_eq!(json["Critical"], 5.0);
    }

    #[test]
    fn test_from_index_matches_order() {
        assert_eq!(RiskCategory::from_index(0), Some(RiskCategory::Low));
        assert_eq!(RiskCategory::from_index(3), Some(RiskCategory::Critical));
        assert_eq!(RiskCategory::from_index(4), None);
    }
}
