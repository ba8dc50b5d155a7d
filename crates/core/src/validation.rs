//! Business rules for the `Movie` entity.
//!
//! Every rule runs on every call; the result lists each violated field so a
//! caller can report all problems at once. Release-date bounds depend on the
//! `now` passed in.

use chrono::Months;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::movie::{
    Movie, MIN_DURATION_MINUTES, SUMMARY_MAX_LEN, SUMMARY_MIN_LEN, TITLE_MAX_LEN, TITLE_MIN_LEN,
};
use crate::types::Timestamp;

pub const FIELD_TITLE: &str = "Title";
pub const FIELD_SUMMARY: &str = "Summary";
pub const FIELD_POSTER_URI: &str = "PosterUri";
pub const FIELD_RELEASE_DATE: &str = "ReleaseDate";
pub const FIELD_OFF_THEATERS_DATE: &str = "OffTheatersDate";
pub const FIELD_DURATION: &str = "Duration";

/// Aggregated result of running every movie rule once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldViolation>,
}

impl ValidationResult {
    /// True when at least one violation was reported for `field`.
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a movie against the business rules as of `now`.
///
/// The room classification needs no check here: [`crate::movie::Room`] is a
/// closed enum, so unknown values are rejected when a request is parsed.
pub fn validate_movie(movie: &Movie, now: Timestamp) -> ValidationResult {
    let errors: Vec<FieldViolation> = [
        check_title(&movie.title),
        check_summary(&movie.summary),
        check_poster_uri(&movie.poster_uri),
        check_release_date(movie.release_date, now),
        check_off_theaters_date(movie.off_theaters_date, movie.release_date),
        check_duration(movie.duration),
    ]
    .into_iter()
    .flatten()
    .collect();

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Option<FieldViolation> {
    if value.trim().is_empty() {
        return Some(FieldViolation::new(
            field,
            format!("'{field}' must not be empty."),
        ));
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Some(FieldViolation::new(
            field,
            format!("'{field}' must be between {min} and {max} characters. You entered {len} characters."),
        ));
    }
    None
}

fn check_title(title: &str) -> Option<FieldViolation> {
    check_length(FIELD_TITLE, title, TITLE_MIN_LEN, TITLE_MAX_LEN)
}

fn check_summary(summary: &str) -> Option<FieldViolation> {
    check_length(FIELD_SUMMARY, summary, SUMMARY_MIN_LEN, SUMMARY_MAX_LEN)
}

fn check_poster_uri(uri: &str) -> Option<FieldViolation> {
    if uri.trim().is_empty() {
        return Some(FieldViolation::new(
            FIELD_POSTER_URI,
            format!("'{FIELD_POSTER_URI}' must not be empty."),
        ));
    }
    // `Url::parse` only accepts absolute URIs; "google.com" fails with
    // `RelativeUrlWithoutBase`.
    match Url::parse(uri) {
        Ok(_) => None,
        Err(_) => Some(FieldViolation::new(
            FIELD_POSTER_URI,
            format!("'{FIELD_POSTER_URI}' must be an absolute URI."),
        )),
    }
}

fn check_release_date(release: Timestamp, now: Timestamp) -> Option<FieldViolation> {
    let earliest = now - chrono::Duration::days(1);
    let latest = now
        .checked_add_months(Months::new(12))
        .unwrap_or(Timestamp::MAX_UTC);

    if release <= earliest {
        return Some(FieldViolation::new(
            FIELD_RELEASE_DATE,
            format!("'{FIELD_RELEASE_DATE}' must be greater than '{earliest}'."),
        ));
    }
    if release >= latest {
        return Some(FieldViolation::new(
            FIELD_RELEASE_DATE,
            format!("'{FIELD_RELEASE_DATE}' must be less than '{latest}'."),
        ));
    }
    None
}

fn check_off_theaters_date(off: Timestamp, release: Timestamp) -> Option<FieldViolation> {
    if off <= release {
        return Some(FieldViolation::new(
            FIELD_OFF_THEATERS_DATE,
            format!("'{FIELD_OFF_THEATERS_DATE}' must be greater than '{FIELD_RELEASE_DATE}'."),
        ));
    }
    None
}

fn check_duration(duration: chrono::Duration) -> Option<FieldViolation> {
    if duration < chrono::Duration::minutes(MIN_DURATION_MINUTES) {
        return Some(FieldViolation::new(
            FIELD_DURATION,
            format!("'{FIELD_DURATION}' must be at least {MIN_DURATION_MINUTES} minutes."),
        ));
    }
    None
}
