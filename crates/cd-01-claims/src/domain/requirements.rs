//! Required-document resolution.

use super::claim::ClaimType;
use super::document::DocumentKind;

/// Documents each claim type needs beyond the identity document.
const TYPE_REQUIREMENTS: [(ClaimType, &[DocumentKind]); 4] = [
    (ClaimType::Medical, &[DocumentKind::MedicalClearance]),
    (
        ClaimType::Incapacity,
        &[
            DocumentKind::MedicalClearance,
            DocumentKind::IncomeProof,
            DocumentKind::FormA,
            DocumentKind::FormB,
        ],
    ),
    (
        ClaimType::Rejection,
        &[
            DocumentKind::FormalNotice,
            DocumentKind::IncomeProof,
            DocumentKind::FormA,
            DocumentKind::FormB,
        ],
    ),
    (ClaimType::Other, &[]),
];

/// Mandatory document kinds for a submission, in the order they are checked.
///
/// The identity document always comes first; the revocation letter is
/// appended last when the applicant had prior representation.
pub fn required_documents(claim_type: ClaimType, prior_representation: bool) -> Vec<DocumentKind> {
    let mut required = vec![DocumentKind::Identity];
    if let Some((_, kinds)) = TYPE_REQUIREMENTS.iter().find(|(t, _)| *t == claim_type) {
        required.extend_from_slice(kinds);
    }
    if prior_representation {
        required.push(DocumentKind::RevocationLetter);
    }
    required
}

/// First required kind not present in `supplied`.
pub fn first_missing(required: &[DocumentKind], supplied: &[DocumentKind]) -> Option<DocumentKind> {
    required
        .iter()
        .copied()
        .find(|kind| !supplied.contains(kind))
}
