//! Intake input: applicant fields and supplied files.

use super::claim::ClaimType;
use super::document::DocumentKind;
use bytes::Bytes;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Applicant fields of a submission, already decoded from the transport.
#[derive(Debug, Clone, Validate)]
pub struct ApplicantData {
    #[validate(
        length(min = 3, message = "must be at least 3 characters"),
        custom(function = "validate_person_name")
    )]
    pub name: String,
    #[validate(custom(function = "validate_national_id"))]
    pub national_id: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub claim_type: ClaimType,
    pub claim_subtype: Option<String>,
    pub work_schedule: Option<String>,
    pub work_address: Option<String>,
    pub commute_route: Option<String>,
    pub prior_representation: bool,
}

impl ApplicantData {
    /// Run field validation, rendering failures as one message naming each field.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| describe_errors(&e))
    }
}

/// One file attached to a submission.
#[derive(Debug, Clone)]
pub struct SuppliedDocument {
    pub kind: DocumentKind,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A complete intake request.
#[derive(Debug, Clone)]
pub struct ClaimSubmission {
    pub applicant: ApplicantData,
    pub documents: Vec<SuppliedDocument>,
}

impl ClaimSubmission {
    pub fn supplied_kinds(&self) -> Vec<DocumentKind> {
        self.documents.iter().map(|d| d.kind).collect()
    }
}

/// Parse the prior-representation indicator. Absent means `false`.
pub fn parse_prior_representation(raw: Option<&str>) -> Result<bool, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(format!(
            "priorRepresentation: expected true or false, got '{raw}'"
        )),
    }
}

/// Trim optional text; empty becomes `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().all(|c| c.is_alphabetic() || c == ' ') && !name.trim().is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new("person_name")
            .with_message(Cow::Borrowed("may contain only letters and spaces")))
    }
}

fn validate_national_id(id: &str) -> Result<(), ValidationError> {
    if (7..=8).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("national_id")
            .with_message(Cow::Borrowed("must be 7 to 8 digits")))
    }
}

fn wire_name(field: &str) -> &str {
    match field {
        "national_id" => "nationalId",
        other => other,
    }
}

fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .map(|(field, errs)| {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{} {}", wire_name(&field), reason)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
