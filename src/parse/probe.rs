//! Structured point-query response decoding
//!
//! A probe command answers with YAML: a top-level `pointdata` key holding one
//! map of field name -> value per queried point. Unlike the run-output scan,
//! anything missing here is an error: the response is a strict contract and
//! an omission means the tool and harness disagree about the format.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::common::{Error, Result};

/// Decoded point-query response
#[derive(Debug, Deserialize)]
pub struct ProbeRecord {
    /// Per-point field values, in query order
    pub pointdata: Vec<BTreeMap<String, serde_yaml::Value>>,
}

impl ProbeRecord {
    /// Decode a probe response; a missing `pointdata` key is a loud failure
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| Error::ProbeMalformed(format!("expected a pointdata mapping: {e}")))
    }

    /// Number of points in the response
    pub fn len(&self) -> usize {
        self.pointdata.len()
    }

    /// Whether the response carries no points at all
    pub fn is_empty(&self) -> bool {
        self.pointdata.is_empty()
    }

    /// Look up one named field at one point index, coerced to f64
    ///
    /// Numeric strings are accepted (the tool is free to quote values);
    /// anything else non-numeric is a contract violation.
    pub fn field(&self, point: usize, name: &str) -> Result<f64> {
        let record = self.pointdata.get(point).ok_or_else(|| {
            Error::ProbeMalformed(format!(
                "no point {point} in response ({} point(s) present)",
                self.pointdata.len()
            ))
        })?;
        let value = record.get(name).ok_or_else(|| {
            Error::ProbeMalformed(format!("field '{name}' missing at point {point}"))
        })?;
        coerce_f64(value).ok_or_else(|| {
            Error::ProbeMalformed(format!(
                "field '{name}' at point {point} is not numeric: {value:?}"
            ))
        })
    }
}

fn coerce_f64(value: &serde_yaml::Value) -> Option<f64> {
    match value {
        serde_yaml::Value::Number(n) => n.as_f64(),
        serde_yaml::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "\
pointdata:
- rho: 0.0417124
  p: 7152.19
  T: 597.22
  vel.x: 587.33
";

    #[test]
    fn test_parse_single_point_response() {
        let record = ProbeRecord::parse(RESPONSE).unwrap();
        assert_eq!(record.len(), 1);
        assert!((record.field(0, "p").unwrap() - 7152.19).abs() < 1e-9);
        assert!((record.field(0, "vel.x").unwrap() - 587.33).abs() < 1e-9);
    }

    #[test]
    fn test_quoted_numeric_values_coerce() {
        let record = ProbeRecord::parse("pointdata:\n- rho: '0.0124931'\n").unwrap();
        assert!((record.field(0, "rho").unwrap() - 0.0124931).abs() < 1e-9);
    }

    #[test]
    fn test_missing_top_level_key_is_loud() {
        let err = ProbeRecord::parse("flowdata:\n- rho: 1.0\n").unwrap_err();
        assert!(matches!(err, Error::ProbeMalformed(_)));
    }

    #[test]
    fn test_missing_field_is_loud() {
        let record = ProbeRecord::parse(RESPONSE).unwrap();
        let err = record.field(0, "massf").unwrap_err();
        assert!(err.to_string().contains("massf"));
    }

    #[test]
    fn test_missing_point_is_loud() {
        let record = ProbeRecord::parse(RESPONSE).unwrap();
        let err = record.field(3, "rho").unwrap_err();
        assert!(matches!(err, Error::ProbeMalformed(_)));
    }

    #[test]
    fn test_non_numeric_field_is_loud() {
        let record = ProbeRecord::parse("pointdata:\n- rho: [1, 2]\n").unwrap();
        let err = record.field(0, "rho").unwrap_err();
        assert!(matches!(err, Error::ProbeMalformed(_)));
    }
}
