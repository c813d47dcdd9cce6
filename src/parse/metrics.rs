//! Marker scan over free-form solver run output
//!
//! Solver stdout is diagnostic text with a handful of tagged lines mixed in.
//! Treating it as a stream of optionally-tagged lines instead of a fixed
//! schema tolerates extra log lines without breaking the harness.

/// Marker for the solver's stop condition
pub const STOP_REASON: &str = "STOP-REASON";
/// Marker for the step count on the final iteration
pub const FINAL_STEP: &str = "FINAL-STEP";
/// Marker for the simulated time on the final iteration
pub const FINAL_TIME: &str = "FINAL-TIME";

/// Named scalars recovered from a solver run's stdout
///
/// Fields stay `None` when their marker never appeared (or its value failed
/// to parse), so a genuine step count of 0 is distinguishable from a missing
/// marker. Validation treats an absent field as a failed expectation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    /// Value after the STOP-REASON marker, remaining tokens joined by spaces
    pub stop_reason: Option<String>,
    /// First token after the FINAL-STEP marker, as an integer
    pub final_step: Option<i64>,
    /// First token after the FINAL-TIME marker, as a float
    pub final_time: Option<f64>,
}

impl RunSummary {
    /// Scan the whole text; for a repeated marker the last occurrence wins
    pub fn parse(text: &str) -> Self {
        let mut summary = Self::default();
        for line in text.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if let Some(rest) = tokens_after(&tokens, STOP_REASON) {
                if !rest.is_empty() {
                    summary.stop_reason = Some(rest.join(" "));
                }
            }
            if let Some(rest) = tokens_after(&tokens, FINAL_STEP) {
                if let Some(value) = rest.first().and_then(|t| t.parse::<i64>().ok()) {
                    summary.final_step = Some(value);
                }
            }
            if let Some(rest) = tokens_after(&tokens, FINAL_TIME) {
                if let Some(value) = rest.first().and_then(|t| t.parse::<f64>().ok()) {
                    summary.final_time = Some(value);
                }
            }
        }
        summary
    }
}

/// Tokens following the token that carries the marker, if any
fn tokens_after<'a>(tokens: &'a [&'a str], marker: &str) -> Option<&'a [&'a str]> {
    tokens
        .iter()
        .position(|t| t.contains(marker))
        .map(|i| &tokens[i + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_output_round_trips() {
        let text = "\
Step 430: t=0.000494
STOP-REASON maximum-time reached
FINAL-STEP 435
FINAL-TIME 0.0005
done.
";
        let summary = RunSummary::parse(text);
        assert_eq!(summary.stop_reason.as_deref(), Some("maximum-time reached"));
        assert_eq!(summary.final_step, Some(435));
        assert_eq!(summary.final_time, Some(0.0005));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let text = "FINAL-STEP 100\nnoise\nFINAL-STEP 435\n";
        let summary = RunSummary::parse(text);
        assert_eq!(summary.final_step, Some(435));
    }

    #[test]
    fn test_absent_markers_stay_none() {
        let summary = RunSummary::parse("just ordinary log chatter\n");
        assert_eq!(summary.stop_reason, None);
        assert_eq!(summary.final_step, None);
        assert_eq!(summary.final_time, None);
    }

    #[test]
    fn test_marker_with_punctuation_token() {
        // Some output styles write the marker with a trailing colon.
        let summary = RunSummary::parse("FINAL-TIME: 5.0e-4\n");
        assert_eq!(summary.final_time, Some(5.0e-4));
    }

    #[test]
    fn test_stop_reason_joins_remaining_tokens() {
        let summary = RunSummary::parse("STOP-REASON   maximum-time   5.000e-04\n");
        assert_eq!(
            summary.stop_reason.as_deref(),
            Some("maximum-time 5.000e-04")
        );
    }

    #[test]
    fn test_unparseable_value_treated_as_absent() {
        let summary = RunSummary::parse("FINAL-STEP lots\n");
        assert_eq!(summary.final_step, None);
    }

    #[test]
    fn test_zero_step_distinct_from_absent() {
        let summary = RunSummary::parse("FINAL-STEP 0\n");
        assert_eq!(summary.final_step, Some(0));
    }

    #[test]
    fn test_marker_only_line_leaves_field_none() {
        let summary = RunSummary::parse("STOP-REASON\n");
        assert_eq!(summary.stop_reason, None);
    }
}
