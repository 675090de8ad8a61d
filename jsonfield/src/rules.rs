use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationIssue;
use crate::validators::{is_valid_email, is_valid_url, is_valid_uuid};

/// A validation rule declared on a leaf field.
///
/// Rules apply to the raw submitted string. Everything except `Required`
/// skips absent or empty submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    Required,
    Length {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Regex {
        pattern: String,
    },
    Enum {
        allowed: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
    },
    Email,
    Url,
    Uuid,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::Required => f.write_str("required"),
            ValidationRule::Length { min, max } => write!(f, "length:{}", bounds(min, max)),
            ValidationRule::Range { min, max } => write!(f, "range:{}", bounds(min, max)),
            ValidationRule::Regex { pattern } => write!(f, "regex:{pattern}"),
            ValidationRule::Enum { allowed, .. } => write!(f, "in:{}", allowed.join(",")),
            ValidationRule::Email => f.write_str("email"),
            ValidationRule::Url => f.write_str("url"),
            ValidationRule::Uuid => f.write_str("uuid"),
        }
    }
}

fn bounds<T: fmt::Display>(min: &Option<T>, max: &Option<T>) -> String {
    let render = |bound: &Option<T>| bound.as_ref().map(ToString::to_string).unwrap_or_else(|| "*".to_string());
    format!("{}..{}", render(min), render(max))
}

/// Checks one submitted value against one rule, appending any failure to `issues`.
pub fn validate_rule_on_input(field: &str, rule: &ValidationRule, input: Option<&str>, issues: &mut Vec<ValidationIssue>) {
    let candidate = match input {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            if matches!(rule, ValidationRule::Required) {
                issues.push(ValidationIssue::new(field, "validation.required", "field is required"));
            }
            return;
        }
    };

    match rule {
        ValidationRule::Required => {}
        ValidationRule::Length { min, max } => {
            let len = candidate.chars().count();
            if let Some(min_len) = min
                && len < *min_len
            {
                issues.push(ValidationIssue::new(
                    field,
                    "validation.length",
                    format!("length must be at least {min_len}"),
                ));
            }
            if let Some(max_len) = max
                && len > *max_len
            {
                issues.push(ValidationIssue::new(
                    field,
                    "validation.length",
                    format!("length must be at most {max_len}"),
                ));
            }
        }
        ValidationRule::Range { min, max } => match candidate.trim().parse::<f64>() {
            Ok(number) => {
                if let Some(lower) = min
                    && number < *lower
                {
                    issues.push(ValidationIssue::new(
                        field,
                        "validation.range",
                        format!("value must be at least {lower}"),
                    ));
                }
                if let Some(upper) = max
                    && number > *upper
                {
                    issues.push(ValidationIssue::new(
                        field,
                        "validation.range",
                        format!("value must be at most {upper}"),
                    ));
                }
            }
            Err(_) => issues.push(ValidationIssue::new(field, "validation.numeric", "value must be numeric")),
        },
        ValidationRule::Regex { pattern } => {
            if Regex::new(pattern).map(|regex| !regex.is_match(candidate)).unwrap_or(false) {
                issues.push(ValidationIssue::new(
                    field,
                    "validation.regex",
                    format!("value does not match pattern {pattern}"),
                ));
            }
        }
        ValidationRule::Enum {
            allowed,
            case_insensitive,
        } => {
            let accepted = if *case_insensitive {
                allowed.iter().any(|option| option.eq_ignore_ascii_case(candidate))
            } else {
                allowed.iter().any(|option| option == candidate)
            };
            if !accepted {
                issues.push(ValidationIssue::new(
                    field,
                    "validation.enum",
                    format!("value must be one of {allowed:?}"),
                ));
            }
        }
        ValidationRule::Email => {
            if !is_valid_email(candidate) {
                issues.push(ValidationIssue::new(
                    field,
                    "validation.email",
                    "value must be a valid email address",
                ));
            }
        }
        ValidationRule::Url => {
            if !is_valid_url(candidate) {
                issues.push(ValidationIssue::new(field, "validation.url", "value must be a valid URL"));
            }
        }
        ValidationRule::Uuid => {
            if !is_valid_uuid(candidate) {
                issues.push(ValidationIssue::new(field, "validation.uuid", "value must be a valid UUID"));
            }
        }
    }
}
