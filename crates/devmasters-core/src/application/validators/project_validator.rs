//! Project validation
//!
//! Sanitizes and validates project inputs. Create and update run the exact
//! same rules.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

static TITLE_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("title pattern is valid"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F]").expect("control pattern is valid"));

/// Validator for project fields
pub struct ProjectValidator;

impl ProjectValidator {
    /// Strip everything but letters, digits, underscore, whitespace and
    /// hyphen, then collapse whitespace runs and trim.
    pub fn sanitize_title(title: &str) -> String {
        let stripped = TITLE_DISALLOWED.replace_all(title, "");
        WHITESPACE_RUN
            .replace_all(&stripped, " ")
            .trim()
            .to_string()
    }

    /// Remove C0 control characters and DEL.
    pub fn sanitize_description(description: &str) -> String {
        CONTROL_CHARS.replace_all(description, "").into_owned()
    }

    /// Sanitize and validate a title
    ///
    /// Rules:
    /// - Must not be empty after sanitization
    /// - Must be between 3 and 100 characters after sanitization
    pub fn validate_title(title: &str) -> Result<String> {
        let title = Self::sanitize_title(title);
        if title.is_empty() {
            return Err(Error::validation(
                "title",
                "must contain at least one letter, digit, underscore or hyphen",
            ));
        }

        check_length("title", &title, TITLE_MIN_CHARS, TITLE_MAX_CHARS)?;
        Ok(title)
    }

    /// Sanitize and validate a description
    ///
    /// Rules:
    /// - Must be between 10 and 2000 characters after sanitization
    pub fn validate_description(description: &str) -> Result<String> {
        let description = Self::sanitize_description(description);
        check_length(
            "description",
            &description,
            DESCRIPTION_MIN_CHARS,
            DESCRIPTION_MAX_CHARS,
        )?;
        Ok(description)
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(Error::validation(
            field,
            format!("must be at least {} characters (got {})", min, len),
        ));
    }
    if len > max {
        return Err(Error::validation(
            field,
            format!("must be {} characters or less (got {})", max, len),
        ));
    }
    Ok(())
}
