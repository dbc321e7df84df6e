//! Declarative validation rules layered on top of a field type's own format check.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::FieldValue;

/// Anchored regexes compiled from declared patterns, keyed by the declared source.
static COMPILED_PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Compiled, anchored form of `pattern`. Compiles once per distinct pattern.
fn compiled_pattern(pattern: &str) -> Result<Regex, ValidationIssue> {
    if let Some(re) = COMPILED_PATTERNS
        .read()
        .ok()
        .and_then(|patterns| patterns.get(pattern).cloned())
    {
        return Ok(re);
    }

    let re = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
        ValidationIssue::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        }
    })?;
    if let Ok(mut patterns) = COMPILED_PATTERNS.write() {
        patterns.insert(pattern.to_string(), re.clone());
    }
    Ok(re)
}

/// Constraints attached to a field declaration.
///
/// Serialized flat so a YAML field declaration can carry `required: true`,
/// `max_length: 80` and friends next to its name and type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationRules {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression the whole raw value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_message: Option<String>,
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check a non-empty raw value against length, range and pattern rules.
    ///
    /// `decoded` is the value the field type produced for `raw`; range rules
    /// only apply when it is numeric.
    pub fn check(&self, raw: &str, decoded: Option<&FieldValue>) -> Result<(), ValidationIssue> {
        let len = raw.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                return Err(ValidationIssue::TooShort { min });
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(ValidationIssue::TooLong { max });
            }
        }

        if let Some(number) = decoded.and_then(FieldValue::as_f64) {
            if let Some(min) = self.min {
                if number < min {
                    return Err(ValidationIssue::BelowMinimum { min });
                }
            }
            if let Some(max) = self.max {
                if number > max {
                    return Err(ValidationIssue::AboveMaximum { max });
                }
            }
        }

        if let Some(pattern) = &self.pattern {
            let re = compiled_pattern(pattern)?;
            if !re.is_match(raw) {
                return Err(ValidationIssue::PatternMismatch {
                    pattern: pattern.clone(),
                    message: self.pattern_message.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Why a raw field value was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("{}", .message.as_deref().unwrap_or("a value is required"))]
    Required { message: Option<String> },

    /// The value does not parse as the field type
    #[error("'{value}' is not a valid {expected} value")]
    Malformed { expected: String, value: String },

    #[error("must be at least {min} characters")]
    TooShort { min: usize },

    #[error("must be at most {max} characters")]
    TooLong { max: usize },

    #[error("must be at least {min}")]
    BelowMinimum { min: f64 },

    #[error("must be at most {max}")]
    AboveMaximum { max: f64 },

    #[error("{}", pattern_mismatch_text(.pattern, .message))]
    PatternMismatch {
        pattern: String,
        message: Option<String>,
    },

    /// The declared pattern is not a valid regular expression
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

fn pattern_mismatch_text(pattern: &str, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("must match the pattern {pattern}"),
    }
}
