//! Multipart intake form decoding.
//!
//! Only whitelisted fields are accepted: the applicant text fields and one
//! file field per document kind. Anything else, or a text field sent twice,
//! is rejected before the submission reaches the claims service. Repeated
//! file fields are passed through and rejected by intake validation.
//!
//! File parts are buffered up to [`MAX_DOCUMENT_BYTES`]; a larger part is
//! drained without buffering and rejected with its full size.

use crate::domain::error::ApiError;
use axum::extract::multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use cd_01_claims::domain::{normalize_optional, parse_prior_representation};
use cd_01_claims::{
    ApplicantData, ClaimError, ClaimSubmission, ClaimType, DocumentKind, SuppliedDocument,
    MAX_DOCUMENT_BYTES,
};
use tracing::debug;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Name,
    NationalId,
    Email,
    ClaimType,
    ClaimSubtype,
    WorkSchedule,
    WorkAddress,
    CommuteRoute,
    PriorRepresentation,
}

impl TextField {
    const ALL: [TextField; 9] = [
        TextField::Name,
        TextField::NationalId,
        TextField::Email,
        TextField::ClaimType,
        TextField::ClaimSubtype,
        TextField::WorkSchedule,
        TextField::WorkAddress,
        TextField::CommuteRoute,
        TextField::PriorRepresentation,
    ];

    fn form_name(self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::NationalId => "nationalId",
            TextField::Email => "email",
            TextField::ClaimType => "claimType",
            TextField::ClaimSubtype => "claimSubtype",
            TextField::WorkSchedule => "workSchedule",
            TextField::WorkAddress => "workAddress",
            TextField::CommuteRoute => "commuteRoute",
            TextField::PriorRepresentation => "priorRepresentation",
        }
    }

    fn from_form_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.form_name() == name)
    }
}

/// Accumulates decoded form parts.
#[derive(Debug, Default)]
pub struct IntakeForm {
    text: [Option<String>; 9],
    documents: Vec<SuppliedDocument>,
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept_text(&mut self, name: &str, value: String) -> Result<(), ApiError> {
        let field = TextField::from_form_name(name)
            .ok_or_else(|| ApiError::bad_request(format!("Unexpected field: {name}")))?;
        let slot = &mut self.text[field as usize];
        if slot.is_some() {
            return Err(ApiError::bad_request(format!(
                "Field supplied more than once: {name}"
            )));
        }
        *slot = Some(value);
        Ok(())
    }

    pub fn accept_file(
        &mut self,
        kind: DocumentKind,
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Bytes,
    ) {
        self.documents.push(SuppliedDocument {
            kind,
            file_name,
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes,
        });
    }

    fn take(&mut self, field: TextField) -> Option<String> {
        self.text[field as usize].take()
    }

    /// Build the submission. Field-level validation stays with the claims
    /// service; only the prior-representation flag is decoded here.
    pub fn into_submission(mut self) -> Result<ClaimSubmission, ClaimError> {
        let prior_representation =
            parse_prior_representation(self.take(TextField::PriorRepresentation).as_deref())
                .map_err(ClaimError::InvalidApplicant)?;
        let claim_type = ClaimType::parse(self.take(TextField::ClaimType).as_deref());

        let required_text = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();
        let applicant = ApplicantData {
            name: required_text(self.take(TextField::Name)),
            national_id: required_text(self.take(TextField::NationalId)),
            email: required_text(self.take(TextField::Email)),
            claim_type,
            claim_subtype: normalize_optional(self.take(TextField::ClaimSubtype)),
            work_schedule: normalize_optional(self.take(TextField::WorkSchedule)),
            work_address: normalize_optional(self.take(TextField::WorkAddress)),
            commute_route: normalize_optional(self.take(TextField::CommuteRoute)),
            prior_representation,
        };

        Ok(ClaimSubmission {
            applicant,
            documents: self.documents,
        })
    }
}

/// Drain a multipart body into an [`IntakeForm`].
pub async fn read_intake_form(mut multipart: Multipart) -> Result<IntakeForm, ApiError> {
    let mut form = IntakeForm::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_string) else {
            return Err(ApiError::bad_request("Form part without a field name"));
        };

        if let Some(kind) = DocumentKind::from_form_field(&name) {
            read_file(&mut form, kind, field).await?;
        } else {
            let value = field.text().await.map_err(malformed)?;
            form.accept_text(&name, value)?;
        }
    }

    Ok(form)
}

async fn read_file(
    form: &mut IntakeForm,
    kind: DocumentKind,
    mut field: Field<'_>,
) -> Result<(), ApiError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let mut buffer = BytesMut::new();
    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        size += chunk.len();
        if size <= MAX_DOCUMENT_BYTES {
            buffer.extend_from_slice(&chunk);
        }
    }
    if size > MAX_DOCUMENT_BYTES {
        debug!(kind = kind.api_name(), size, "Rejected oversized document part");
        return Err(ClaimError::DocumentTooLarge {
            kind,
            size,
            max: MAX_DOCUMENT_BYTES,
        }
        .into());
    }

    debug!(kind = kind.api_name(), size, "Received document part");
    form.accept_file(kind, file_name, content_type, buffer.freeze());
    Ok(())
}

fn malformed(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::bad_request(format!("Malformed multipart body: {err}"))
}
