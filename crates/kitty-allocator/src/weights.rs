//! Weight specification: `"performanceScore:0.4,activeClients:0.6"`

use std::str::FromStr;

use kitty_common::{ConfigError, Parameter};
use tracing::warn;

/// Tolerance on the weight sum before a drift warning is logged
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Ordered parameter weights
///
/// Declaration order is kept: it breaks ties when ranking parameters for a
/// justification.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightConfig {
    entries: Vec<(Parameter, f64)>,
}

impl WeightConfig {
    /// Build from explicit entries, applying the same checks as [`WeightConfig::parse`]
    pub fn new(entries: Vec<(Parameter, f64)>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyWeights);
        }
        for (i, (param, weight)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(p, _)| p == param) {
                return Err(ConfigError::DuplicateParameter(param.to_string()));
            }
            if !is_valid_weight(*weight) {
                return Err(ConfigError::InvalidWeight {
                    parameter: param.to_string(),
                    raw: weight.to_string(),
                });
            }
        }

        let config = Self { entries };
        let total = config.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!(total, "Parameter weights do not sum to 1");
        }
        Ok(config)
    }

    /// Parse a comma separated list of `name:weight` pairs
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        if spec.trim().is_empty() {
            return Err(ConfigError::EmptyWeights);
        }

        let mut entries = Vec::new();
        for segment in spec.split(',') {
            let mut parts = segment.split(':');
            let (Some(name), Some(raw), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(ConfigError::MalformedWeight(segment.to_string()));
            };

            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::MalformedWeight(segment.to_string()));
            }
            let param: Parameter = name
                .parse()
                .map_err(ConfigError::UnknownParameter)?;

            let raw = raw.trim();
            let weight = raw
                .parse::<f64>()
                .ok()
                .filter(|w| is_valid_weight(*w))
                .ok_or_else(|| ConfigError::InvalidWeight {
                    parameter: param.to_string(),
                    raw: raw.to_string(),
                })?;

            entries.push((param, weight));
        }

        Self::new(entries)
    }

    /// Iterate `(parameter, weight)` in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Weight of a parameter, if configured
    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.entries
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, w)| *w)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }
}

impl FromStr for WeightConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && (0.0..=1.0).contains(&weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_declaration_order() {
        let weights = WeightConfig::parse(
            "performanceScore:0.4, targetAchievedPercent:0.3 ,activeClients: 0.2,seniorityMonths:0.1",
        )
        .unwrap();

        let params: Vec<_> = weights.iter().map(|(p, _)| p).collect();
        assert_eq!(
            params,
            vec![
                Parameter::PerformanceScore,
                Parameter::TargetAchievedPercent,
                Parameter::ActiveClients,
                Parameter::SeniorityMonths,
            ]
        );
        assert_eq!(weights.get(Parameter::ActiveClients), Some(0.2));
        assert!((weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_numeric_weight_rejected() {
        let err = WeightConfig::parse("performanceScore:abc").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidWeight {
                parameter: "performanceScore".to_string(),
                raw: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_non_finite_and_out_of_range_rejected() {
        assert!(WeightConfig::parse("performanceScore:NaN").is_err());
        assert!(WeightConfig::parse("performanceScore:inf").is_err());
        assert!(WeightConfig::parse("performanceScore:-0.5").is_err());
        assert!(WeightConfig::parse("performanceScore:1.5").is_err());
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let err = WeightConfig::parse("performanceScore:0.5,salesVolume:0.5").unwrap_err();
        assert_eq!(err, ConfigError::UnknownParameter("salesVolume".to_string()));
    }

    #[test]
    fn test_malformed_segments_rejected() {
        assert!(matches!(
            WeightConfig::parse("performanceScore"),
            Err(ConfigError::MalformedWeight(_))
        ));
        assert!(matches!(
            WeightConfig::parse("performanceScore:0.5:0.1"),
            Err(ConfigError::MalformedWeight(_))
        ));
        assert!(matches!(
            WeightConfig::parse("performanceScore:1,"),
            Err(ConfigError::MalformedWeight(_))
        ));
        assert_eq!(WeightConfig::parse("  "), Err(ConfigError::EmptyWeights));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let err = WeightConfig::parse("activeClients:0.5,activeClients:0.5").unwrap_err();
        assert_eq!(err, ConfigError::DuplicateParameter("activeClients".to_string()));
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let weights: WeightConfig = "performanceScore:0.2,activeClients:0.2".parse().unwrap();
        assert_eq!(weights.len(), 2);
        assert!((weights.total() - 0.4).abs() < 1e-12);
    }
}
