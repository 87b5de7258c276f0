//! Document kinds and the registry that ties each kind to its names.
//!
//! Every place that needs to translate between a document role and one of its
//! external names (download path segment, multipart field, blob key tag,
//! record field) goes through [`DocumentKind::descriptor`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted size of a single supplied document, inclusive.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// The fixed set of document roles a claim may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Identity,
    IncomeProof,
    FormA,
    FormB,
    MedicalClearance,
    FormalNotice,
    RevocationLetter,
}

/// External names of one document kind.
#[derive(Debug)]
pub struct DocumentDescriptor {
    pub kind: DocumentKind,
    /// Path segment used by the download endpoint.
    pub api_name: &'static str,
    /// Multipart field carrying the file at intake.
    pub form_field: &'static str,
    /// Short tag used in blob storage keys.
    pub blob_tag: &'static str,
    /// Field name of the storage-key slot on the serialized claim record.
    pub record_field: &'static str,
    /// Human-readable name used in error messages and emails.
    pub label: &'static str,
}

// Order must match the declaration order of `DocumentKind`.
const REGISTRY: [DocumentDescriptor; 7] = [
    DocumentDescriptor {
        kind: DocumentKind::Identity,
        api_name: "identity",
        form_field: "identityDocument",
        blob_tag: "identity",
        record_field: "identityDocumentKey",
        label: "identity document",
    },
    DocumentDescriptor {
        kind: DocumentKind::IncomeProof,
        api_name: "income_proof",
        form_field: "incomeProof",
        blob_tag: "income",
        record_field: "incomeProofKey",
        label: "proof of income",
    },
    DocumentDescriptor {
        kind: DocumentKind::FormA,
        api_name: "form_a",
        form_field: "formA",
        blob_tag: "form_a",
        record_field: "formAKey",
        label: "form A",
    },
    DocumentDescriptor {
        kind: DocumentKind::FormB,
        api_name: "form_b",
        form_field: "formB",
        blob_tag: "form_b",
        record_field: "formBKey",
        label: "form B",
    },
    DocumentDescriptor {
        kind: DocumentKind::MedicalClearance,
        api_name: "medical_clearance",
        form_field: "medicalClearance",
        blob_tag: "medical",
        record_field: "medicalClearanceKey",
        label: "medical clearance",
    },
    DocumentDescriptor {
        kind: DocumentKind::FormalNotice,
        api_name: "formal_notice",
        form_field: "formalNotice",
        blob_tag: "notice",
        record_field: "formalNoticeKey",
        label: "formal notice letter",
    },
    DocumentDescriptor {
        kind: DocumentKind::RevocationLetter,
        api_name: "revocation_letter",
        form_field: "revocationLetter",
        blob_tag: "revocation",
        record_field: "revocationLetterKey",
        label: "revocation letter",
    },
];

impl DocumentKind {
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::Identity,
        DocumentKind::IncomeProof,
        DocumentKind::FormA,
        DocumentKind::FormB,
        DocumentKind::MedicalClearance,
        DocumentKind::FormalNotice,
        DocumentKind::RevocationLetter,
    ];

    pub fn descriptor(self) -> &'static DocumentDescriptor {
        &REGISTRY[self as usize]
    }

    pub fn api_name(self) -> &'static str {
        self.descriptor().api_name
    }

    pub fn form_field(self) -> &'static str {
        self.descriptor().form_field
    }

    pub fn blob_tag(self) -> &'static str {
        self.descriptor().blob_tag
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// Resolve a download path segment, ignoring case and surrounding whitespace.
    pub fn from_api_name(name: &str) -> Option<Self> {
        let name = name.trim();
        REGISTRY
            .iter()
            .find(|d| d.api_name.eq_ignore_ascii_case(name))
            .map(|d| d.kind)
    }

    /// Resolve a multipart field name.
    pub fn from_form_field(field: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|d| d.form_field.eq_ignore_ascii_case(field))
            .map(|d| d.kind)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepted document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentFormat {
    /// Parse a declared content type. Parameters after `;` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            "image/jpeg" | "image/jpg" => Some(DocumentFormat::Jpeg),
            "image/png" => Some(DocumentFormat::Png),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Jpeg => "image/jpeg",
            DocumentFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Jpeg => "jpg",
            DocumentFormat::Png => "png",
        }
    }
}

/// Storage keys of the documents attached to a claim, one slot per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSlots {
    pub identity_document_key: String,
    #[serde(default)]
    pub income_proof_key: Option<String>,
    #[serde(default)]
    pub form_a_key: Option<String>,
    #[serde(default)]
    pub form_b_key: Option<String>,
    #[serde(default)]
    pub medical_clearance_key: Option<String>,
    #[serde(default)]
    pub formal_notice_key: Option<String>,
    #[serde(default)]
    pub revocation_letter_key: Option<String>,
}

impl DocumentSlots {
    /// Build slots from uploaded `(kind, key)` pairs.
    ///
    /// Returns `None` when no identity document key is among them.
    pub fn from_keys<I>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = (DocumentKind, String)>,
    {
        let mut identity = None;
        let mut slots = DocumentSlots {
            identity_document_key: String::new(),
            income_proof_key: None,
            form_a_key: None,
            form_b_key: None,
            medical_clearance_key: None,
            formal_notice_key: None,
            revocation_letter_key: None,
        };
        for (kind, key) in keys {
            match kind {
                DocumentKind::Identity => identity = Some(key),
                other => {
                    if let Some(slot) = slots.optional_slot_mut(other) {
                        *slot = Some(key);
                    }
                }
            }
        }
        slots.identity_document_key = identity?;
        Some(slots)
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Identity => Some(self.identity_document_key.as_str()),
            DocumentKind::IncomeProof => self.income_proof_key.as_deref(),
            DocumentKind::FormA => self.form_a_key.as_deref(),
            DocumentKind::FormB => self.form_b_key.as_deref(),
            DocumentKind::MedicalClearance => self.medical_clearance_key.as_deref(),
            DocumentKind::FormalNotice => self.formal_notice_key.as_deref(),
            DocumentKind::RevocationLetter => self.revocation_letter_key.as_deref(),
        }
    }

    /// Populated slots in registry order.
    pub fn present(&self) -> Vec<(DocumentKind, &str)> {
        DocumentKind::ALL
            .iter()
            .filter_map(|kind| self.get(*kind).map(|key| (*kind, key)))
            .collect()
    }

    fn optional_slot_mut(&mut self, kind: DocumentKind) -> Option<&mut Option<String>> {
        match kind {
            DocumentKind::Identity => None,
            DocumentKind::IncomeProof => Some(&mut self.income_proof_key),
            DocumentKind::FormA => Some(&mut self.form_a_key),
            DocumentKind::FormB => Some(&mut self.form_b_key),
            DocumentKind::MedicalClearance => Some(&mut self.medical_clearance_key),
            DocumentKind::FormalNotice => Some(&mut self.formal_notice_key),
            DocumentKind::RevocationLetter => Some(&mut self.revocation_letter_key),
        }
    }
}
