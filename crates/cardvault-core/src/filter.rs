//! Structured card search filters.

use serde::{Deserialize, Serialize};

use crate::types::{Color, Rarity, SetCode};

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Format legality constraint.
///
/// A filter asks for either cards legal in a format or cards banned in one,
/// never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "format", rename_all = "lowercase")]
pub enum FormatLegality {
    Legal(String),
    Banned(String),
}

impl FormatLegality {
    pub fn format(&self) -> &str {
        match self {
            FormatLegality::Legal(f) | FormatLegality::Banned(f) => f,
        }
    }
}

/// Optional predicates for an advanced card search. Empty fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilterSpec {
    pub name: Option<String>,
    pub colors: Vec<Color>,
    pub color_identity: Vec<Color>,
    pub types: Vec<String>,
    pub oracle_text: Option<String>,
    pub cmc: NumericRange,
    pub power: NumericRange,
    pub toughness: NumericRange,
    pub sets: Vec<SetCode>,
    pub rarities: Vec<Rarity>,
    pub legality: Option<FormatLegality>,
}

impl SearchFilterSpec {
    pub fn is_empty(&self) -> bool {
        self == &SearchFilterSpec::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legality_wire_shape() {
        let spec = SearchFilterSpec {
            legality: Some(FormatLegality::Banned("modern".to_string())),
            ..Default::default()
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value["legality"],
            serde_json::json!({ "status": "banned", "format": "modern" })
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let spec: SearchFilterSpec =
            serde_json::from_str(r#"{ "types": ["creature"], "cmc": { "max": 3 } }"#).unwrap();
        assert_eq!(spec.types, vec!["creature".to_string()]);
        assert_eq!(spec.cmc.max, Some(3.0));
        assert!(spec.cmc.min.is_none());
        assert!(!spec.is_empty());
        assert!(SearchFilterSpec::default().is_empty());
    }
}
