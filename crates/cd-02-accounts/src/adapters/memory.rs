use crate::domain::{Account, AccountId};
use crate::error::AccountRepositoryError;
use crate::ports::outbound::AccountRepository;
use async_trait::async_trait;
use parking_lot::RwLock;

/// In-memory account store.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    pub fn snapshot(&self) -> Vec<Account> {
        self.accounts.read().clone()
    }

    pub fn replace_all(&self, accounts: Vec<Account>) {
        *self.accounts.write() = accounts;
    }

    /// Flip the active flag; returns `false` for an unknown id.
    pub fn set_active(&self, id: AccountId, active: bool) -> bool {
        let mut accounts = self.accounts.write();
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.active = active;
                account.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self
            .accounts
            .read()
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.accounts.read().iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, account: Account) -> Result<(), AccountRepositoryError> {
        let mut accounts = self.accounts.write();
        if accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(AccountRepositoryError::DuplicateEmail(account.email));
        }
        accounts.push(account);
        Ok(())
    }

    async fn count(&self) -> Result<usize, AccountRepositoryError> {
        Ok(self.accounts.read().len())
    }
}
