//! # In-Memory Claim Store
//!
//! Backs unit tests directly. The runtime wraps it with JSON snapshot
//! persistence and swaps whole record sets in through `replace_all`.

use crate::domain::{Claim, ClaimId, ClaimStatus, TrackingCode};
use crate::error::RepositoryError;
use crate::ports::outbound::ClaimRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory claim store.
///
/// Used directly in tests and wrapped by the runtime's snapshot store.
/// Uniqueness of tracking codes is checked under the write lock, so
/// concurrent inserts cannot both claim a code.
#[derive(Default)]
pub struct InMemoryClaimRepository {
    claims: RwLock<Vec<Claim>>,
    unavailable: AtomicBool,
}

impl InMemoryClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records (startup load, fixtures).
    pub fn from_claims(claims: Vec<Claim>) -> Self {
        Self {
            claims: RwLock::new(claims),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Copy of every stored record, in insertion order.
    pub fn snapshot(&self) -> Vec<Claim> {
        self.claims.read().clone()
    }

    /// Swap in a complete record set.
    pub fn replace_all(&self, claims: Vec<Claim>) {
        *self.claims.write() = claims;
    }

    pub fn len(&self) -> usize {
        self.claims.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.read().is_empty()
    }

    /// Make every subsequent call fail with `RepositoryError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ClaimRepository for InMemoryClaimRepository {
    async fn insert(&self, claim: Claim) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut claims = self.claims.write();
        if claims.iter().any(|c| c.tracking_code == claim.tracking_code) {
            return Err(RepositoryError::DuplicateTrackingCode(
                claim.tracking_code.to_string(),
            ));
        }
        claims.push(claim);
        Ok(())
    }

    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, RepositoryError> {
        self.check_available()?;
        Ok(self.claims.read().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_tracking_code(
        &self,
        code: &TrackingCode,
    ) -> Result<Option<Claim>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .claims
            .read()
            .iter()
            .find(|c| &c.tracking_code == code)
            .cloned())
    }

    async fn list(&self, status: Option<ClaimStatus>) -> Result<Vec<Claim>, RepositoryError> {
        self.check_available()?;
        let mut claims: Vec<Claim> = self
            .claims
            .read()
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(claims)
    }

    async fn update_status(
        &self,
        id: ClaimId,
        status: ClaimStatus,
    ) -> Result<Option<Claim>, RepositoryError> {
        self.check_available()?;
        let mut claims = self.claims.write();
        Ok(claims.iter_mut().find(|c| c.id == id).map(|claim| {
            claim.status = status;
            claim.clone()
        }))
    }

    async fn delete(&self, id: ClaimId) -> Result<bool, RepositoryError> {
        self.check_available()?;
        let mut claims = self.claims.write();
        let before = claims.len();
        claims.retain(|c| c.id != id);
        Ok(claims.len() != before)
    }
}
