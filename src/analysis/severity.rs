/// Run severity classification.
///
/// Severity depends on run length only and is looked up in an ordered table
/// of length ranges, so boundaries can be read (and tested) directly off the
/// table instead of a chain of branches.
///
/// The default table keeps length-4 runs at `Normal`: they qualify as runs
/// but are displayed like ordinary readings. See DESIGN.md.

use serde::{Deserialize, Serialize};

use crate::model::{Run, Severity};

/// One row of the severity table: runs with
/// `min_length <= length <= max_length` get `severity`.
/// A missing `max_length` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityRule {
    pub min_length: usize,
    pub max_length: Option<usize>,
    pub severity: Severity,
}

impl SeverityRule {
    pub fn matches(&self, length: usize) -> bool {
        length >= self.min_length && self.max_length.is_none_or(|max| length <= max)
    }
}

/// Station default: 4 → Normal, 5–8 → Caution, 9+ → Alert.
pub const DEFAULT_SEVERITY_RULES: [SeverityRule; 3] = [
    SeverityRule { min_length: 4, max_length: Some(4), severity: Severity::Normal },
    SeverityRule { min_length: 5, max_length: Some(8), severity: Severity::Caution },
    SeverityRule { min_length: 9, max_length: None, severity: Severity::Alert },
];

/// Severity of a run of `length` readings under `rules`.
///
/// First matching rule wins; a length no rule covers is `Normal`.
pub fn classify_length(length: usize, rules: &[SeverityRule]) -> Severity {
    rules
        .iter()
        .find(|rule| rule.matches(length))
        .map(|rule| rule.severity)
        .unwrap_or(Severity::Normal)
}

/// Severity of `run` under the default table.
pub fn classify(run: &Run) -> Severity {
    classify_length(run.length(), &DEFAULT_SEVERITY_RULES)
}

/// Checks that rules are sorted by `min_length`, well-formed, and
/// non-overlapping. Returns a description of the first problem found.
pub fn validate_rules(rules: &[SeverityRule]) -> Result<(), String> {
    for (i, rule) in rules.iter().enumerate() {
        if let Some(max) = rule.max_length {
            if max < rule.min_length {
                return Err(format!(
                    "rule {}: max_length {} is below min_length {}",
                    i, max, rule.min_length
                ));
            }
        }
        if let Some(prev) = i.checked_sub(1).map(|p| &rules[p]) {
            match prev.max_length {
                None => {
                    return Err(format!("rule {}: follows an unbounded rule", i));
                }
                Some(prev_max) if rule.min_length <= prev_max => {
                    return Err(format!(
                        "rule {}: min_length {} overlaps previous rule ending at {}",
                        i, rule.min_length, prev_max
                    ));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}
