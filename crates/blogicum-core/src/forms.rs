//! Form validation.
//!
//! Each form is a raw input struct (what the client posted, all strings) and
//! a `validate_*` function mapping it to `Result<Validated*, FieldErrors>`.
//! Checks that need the store (category exists, username is free) are done
//! by [`BlogService`](crate::service::BlogService) on top of these.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{Comment, Post, User};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";

/// Field name → error messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

fn collect(result: Result<(), ValidationErrors>) -> FieldErrors {
    match result {
        Ok(()) => FieldErrors::new(),
        Err(e) => e.into(),
    }
}

/// HTML checkbox semantics: absent means unchecked.
fn checkbox(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "false" | "0" | "off"),
    }
}

fn optional_id(raw: &str) -> Result<Option<i64>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>().map(Some).map_err(|_| ())
}

/// Parse a publication date as sent by a browser `datetime-local` input or
/// as RFC 3339. Naive values are taken as UTC.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn format_pub_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}

/// Raw post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PostInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 256, message = "Enter a title of at most 256 characters."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    #[serde(default)]
    pub pub_date: String,
    /// Category id; empty when none was chosen.
    #[serde(default)]
    pub category: String,
    /// Location id; empty for "no location".
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<String>,
}

impl PostInput {
    /// Prefill the form from a stored post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: format_pub_date(&post.pub_date),
            category: post.category_id.map(|id| id.to_string()).unwrap_or_default(),
            location: post.location_id.map(|id| id.to_string()).unwrap_or_default(),
            is_published: post.is_published.then(|| "on".to_string()),
        }
    }

    /// Whether the "published" checkbox is ticked.
    pub fn publishes(&self) -> bool {
        checkbox(self.is_published.as_deref())
    }

    fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            ..self.clone()
        }
    }
}

/// A post form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: i64,
    pub location_id: Option<i64>,
    pub is_published: bool,
}

pub fn validate_post(input: &PostInput) -> Result<ValidatedPost, FieldErrors> {
    let input = input.normalized();
    let mut errors = collect(input.validate());

    let pub_date = if input.pub_date.trim().is_empty() {
        errors.add("pub_date", REQUIRED);
        None
    } else {
        let parsed = parse_pub_date(&input.pub_date);
        if parsed.is_none() {
            errors.add("pub_date", "Enter a valid date/time.");
        }
        parsed
    };

    let category_id = match optional_id(&input.category) {
        Ok(Some(id)) => Some(id),
        Ok(None) => {
            errors.add("category", REQUIRED);
            None
        }
        Err(()) => {
            errors.add("category", INVALID_CHOICE);
            None
        }
    };

    let location_id = match optional_id(&input.location) {
        Ok(id) => id,
        Err(()) => {
            errors.add("location", INVALID_CHOICE);
            None
        }
    };

    let is_published = input.publishes();
    match (pub_date, category_id) {
        (Some(pub_date), Some(category_id)) if errors.is_empty() => Ok(ValidatedPost {
            title: input.title,
            text: input.text,
            pub_date,
            category_id,
            location_id,
            is_published,
        }),
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentInput {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComment {
    pub text: String,
}

pub fn validate_comment(input: &CommentInput) -> Result<ValidatedComment, FieldErrors> {
    let input = CommentInput {
        text: input.text.trim().to_string(),
    };
    let errors = collect(input.validate());
    errors.into_result(ValidatedComment { text: input.text })
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.".into(),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl ProfileInput {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Validate)]
struct ProfileFields {
    #[validate(
        length(min = 1, max = 150, message = "Enter a username of at most 150 characters."),
        custom(function = "validate_username")
    )]
    username: String,
    #[validate(email(message = "Enter a valid email address."))]
    email: Option<String>,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    first_name: String,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProfile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn validate_profile(input: &ProfileInput) -> Result<ValidatedProfile, FieldErrors> {
    let email = input.email.trim();
    let fields = ProfileFields {
        username: input.username.trim().to_string(),
        email: (!email.is_empty()).then(|| email.to_string()),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
    };
    let errors = collect(fields.validate());
    errors.into_result(ValidatedProfile {
        username: fields.username,
        email: fields.email.unwrap_or_default(),
        first_name: fields.first_name,
        last_name: fields.last_name,
    })
}

/// Account registration; email may be left blank.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Validate)]
struct RegistrationFields {
    #[validate(
        length(min = 1, max = 150, message = "Enter a username of at most 150 characters."),
        custom(function = "validate_username")
    )]
    username: String,
    #[validate(email(message = "Enter a valid email address."))]
    email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    password: String,
}

pub fn validate_registration(input: &RegistrationInput) -> Result<(), FieldErrors> {
    let email = input.email.trim();
    let fields = RegistrationFields {
        username: input.username.trim().to_string(),
        email: (!email.is_empty()).then(|| email.to_string()),
        password: input.password.clone(),
    };
    collect(fields.validate()).into_result(())
}
