//! Form validation primitives.
//!
//! Handlers collect raw submitted strings into `*Input` structs; the domain
//! validates them into typed forms. Failures are gathered per field so a
//! page can re-render every message at once.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;

use super::Error;

/// Key under which errors not tied to a single field are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const INVALID_TIME: &str = "Enter a valid time.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const EMPTY_FILE: &str = "The submitted file is empty.";

const EMAIL_MAX: usize = 254;
const IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "ico", "jpeg", "jpg", "png", "tif", "tiff", "webp",
];

/// Field name to ordered list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-message error set, handy for checks performed after parsing.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`, empty when none.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn non_field(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Outcome of a failed form submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// User input was rejected; the form should be re-rendered.
    #[error("invalid form: {0}")]
    Invalid(FieldErrors),
    /// Validation passed but applying it failed.
    #[error(transparent)]
    Failed(#[from] Error),
}

impl From<FieldErrors> for FormError {
    fn from(value: FieldErrors) -> Self {
        Self::Invalid(value)
    }
}

/// Bytes of a submitted file along with the client-supplied metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Whether the name or declared content type identifies an image.
    pub fn looks_like_image(&self) -> bool {
        let by_type = self
            .content_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"));
        let by_extension = self
            .extension()
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
        by_type || by_extension
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Collects field errors while extracting typed values from raw input.
///
/// Each accessor returns `None` (or a default) when the field is rejected;
/// callers finish with [`FormValidator::finish`] before using the values.
///
/// # Examples
/// ```
/// use ecoactions::domain::forms::FormValidator;
///
/// let mut v = FormValidator::new();
/// let title = v.required("title", Some("  Plant trees "), Some(200));
/// assert!(v.finish().is_ok());
/// assert_eq!(title.as_deref(), Some("Plant trees"));
/// ```
#[derive(Debug, Default)]
pub struct FormValidator {
    errors: FieldErrors,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn reject_non_field(&mut self, message: impl Into<String>) {
        self.errors.add_non_field(message);
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.has(field)
    }

    fn check_length(&mut self, field: &str, value: &str, max: Option<usize>) -> bool {
        let Some(max) = max else { return true };
        let length = value.chars().count();
        if length > max {
            self.reject(
                field,
                format!("Ensure this value has at most {max} characters (it has {length})."),
            );
            return false;
        }
        true
    }

    /// Trimmed, non-empty text no longer than `max` characters.
    pub fn required(&mut self, field: &str, raw: Option<&str>, max: Option<usize>) -> Option<String> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            self.reject(field, REQUIRED);
            return None;
        }
        self.check_length(field, value, max)
            .then(|| value.to_owned())
    }

    /// Trimmed text that may be blank.
    pub fn optional(&mut self, field: &str, raw: Option<&str>, max: Option<usize>) -> String {
        let value = raw.map(str::trim).unwrap_or_default();
        if self.check_length(field, value, max) {
            value.to_owned()
        } else {
            String::new()
        }
    }

    /// Non-empty secret, kept verbatim.
    pub fn secret(&mut self, field: &str, raw: Option<&str>) -> Option<String> {
        match raw {
            Some(value) if !value.is_empty() => Some(value.to_owned()),
            _ => {
                self.reject(field, REQUIRED);
                None
            }
        }
    }

    pub fn email(&mut self, field: &str, raw: Option<&str>) -> Option<String> {
        let value = self.required(field, raw, Some(EMAIL_MAX))?;
        if email_regex().is_match(&value) {
            Some(value)
        } else {
            self.reject(field, INVALID_EMAIL);
            None
        }
    }

    /// A required identifier selected from a list of choices.
    pub fn choice<T: FromStr>(&mut self, field: &str, raw: Option<&str>) -> Option<T> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            self.reject(field, REQUIRED);
            return None;
        }
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.reject(field, INVALID_CHOICE);
                None
            }
        }
    }

    /// `YYYY-MM-DD`.
    pub fn date(&mut self, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
        let value = self.required(field, raw, None)?;
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map_err(|_| self.reject(field, INVALID_DATE))
            .ok()
    }

    /// `HH:MM` or `HH:MM:SS`.
    pub fn time(&mut self, field: &str, raw: Option<&str>) -> Option<NaiveTime> {
        let value = self.required(field, raw, None)?;
        NaiveTime::parse_from_str(&value, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M"))
            .map_err(|_| self.reject(field, INVALID_TIME))
            .ok()
    }

    pub fn required_file(&mut self, field: &str, file: Option<FileUpload>) -> Option<FileUpload> {
        let Some(file) = file else {
            self.reject(field, REQUIRED);
            return None;
        };
        if file.bytes.is_empty() {
            self.reject(field, EMPTY_FILE);
            return None;
        }
        Some(file)
    }

    /// Optional image; absent is fine, anything present must look like one.
    pub fn optional_image(&mut self, field: &str, file: Option<FileUpload>) -> Option<FileUpload> {
        let file = file?;
        if file.bytes.is_empty() {
            self.reject(field, EMPTY_FILE);
            return None;
        }
        if !file.looks_like_image() {
            self.reject(field, INVALID_IMAGE);
            return None;
        }
        Some(file)
    }

    /// Conclude validation, yielding every recorded error.
    pub fn finish(self) -> Result<(), FieldErrors> {
        self.errors.into_result()
    }

    /// Errors recorded so far. Every accessor that yields `None` for a
    /// required value has recorded one, so this is never empty in that case.
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn required_rejects_blank(#[case] raw: Option<&str>) {
        let mut v = FormValidator::new();
        assert!(v.required("title", raw, Some(10)).is_none());
        let errors = v.finish().expect_err("blank input");
        assert_eq!(errors.get("title"), [REQUIRED.to_owned()]);
    }

    #[rstest]
    fn required_enforces_max_length_in_chars() {
        let mut v = FormValidator::new();
        assert_eq!(v.required("name", Some("ééé"), Some(3)).as_deref(), Some("ééé"));
        assert!(v.required("city", Some("abcd"), Some(3)).is_none());
        let errors = v.finish().expect_err("too long");
        assert!(errors.get("city")[0].contains("at most 3 characters (it has 4)"));
        assert!(!errors.has("name"));
    }

    #[rstest]
    fn secret_is_not_trimmed() {
        let mut v = FormValidator::new();
        assert_eq!(v.secret("password", Some(" pw ")).as_deref(), Some(" pw "));
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("user@localhost", false)]
    #[case("no-at-sign.org", false)]
    fn validates_email_shape(#[case] raw: &str, #[case] ok: bool) {
        let mut v = FormValidator::new();
        assert_eq!(v.email("email", Some(raw)).is_some(), ok);
    }

    #[rstest]
    #[case("2025-06-01", true)]
    #[case("01/06/2025", false)]
    fn parses_iso_dates(#[case] raw: &str, #[case] ok: bool) {
        let mut v = FormValidator::new();
        assert_eq!(v.date("date", Some(raw)).is_some(), ok);
    }

    #[rstest]
    #[case("09:30", true)]
    #[case("09:30:15", true)]
    #[case("half past nine", false)]
    fn parses_times_with_optional_seconds(#[case] raw: &str, #[case] ok: bool) {
        let mut v = FormValidator::new();
        assert_eq!(v.time("time", Some(raw)).is_some(), ok);
    }

    #[rstest]
    fn choice_distinguishes_missing_from_unknown() {
        let mut v = FormValidator::new();
        assert!(v.choice::<crate::domain::CategoryId>("category", None).is_none());
        assert!(v.choice::<crate::domain::CategoryId>("other", Some("x")).is_none());
        let errors = v.finish().expect_err("both rejected");
        assert_eq!(errors.get("category"), [REQUIRED.to_owned()]);
        assert_eq!(errors.get("other"), [INVALID_CHOICE.to_owned()]);
    }

    #[rstest]
    #[case("photo.JPG", None, true)]
    #[case("photo.bin", Some("image/png"), true)]
    #[case("notes.txt", Some("text/plain"), false)]
    fn image_detection(#[case] name: &str, #[case] mime: Option<&str>, #[case] expected: bool) {
        let file = FileUpload::new(name, mime.map(str::to_owned), vec![1]);
        assert_eq!(file.looks_like_image(), expected);
    }

    #[rstest]
    fn optional_image_allows_absence_but_not_garbage() {
        let mut v = FormValidator::new();
        assert!(v.optional_image("photo", None).is_none());
        assert!(v.finish().is_ok());

        let mut v = FormValidator::new();
        let file = FileUpload::new("cv.pdf", Some("application/pdf".to_owned()), vec![1]);
        assert!(v.optional_image("photo", Some(file)).is_none());
        assert_eq!(v.finish().expect_err("not an image").get("photo"), [INVALID_IMAGE.to_owned()]);
    }
}
