//! Persistence seams of the engine.
//!
//! The ledger never talks to a database directly: it goes through these
//! traits, so any document-like store with get / put / delete / filtered
//! queries can back it. No multi-record transaction is assumed; wallet
//! totals are protected by the version check of
//! [`WalletStore::put_totals`] instead.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{ResultEngine, Transaction, TransactionQuery, UserProfile, Wallet};

#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Fails with `NotFound` when the wallet does not exist.
    async fn get(&self, id: Uuid) -> ResultEngine<Wallet>;

    /// Inserts a new wallet, or merges `name`/`image` into an existing one.
    ///
    /// Numeric fields of an existing wallet are left untouched.
    async fn put(&self, wallet: &Wallet) -> ResultEngine<Wallet>;

    /// Writes `amount`, `total_income` and `total_expenses` if the stored
    /// version still equals `wallet.version`, then bumps the version.
    ///
    /// Fails with `Conflict` when somebody else wrote in between.
    async fn put_totals(&self, wallet: &Wallet) -> ResultEngine<Wallet>;

    /// Deletes only the wallet record.
    async fn delete(&self, id: Uuid) -> ResultEngine<()>;

    /// Wallets of a user, newest first.
    async fn list(&self, uid: &str) -> ResultEngine<Vec<Wallet>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Fails with `NotFound` when the transaction does not exist.
    async fn get(&self, id: Uuid) -> ResultEngine<Transaction>;

    /// Inserts or fully overwrites a transaction.
    async fn put(&self, transaction: &Transaction) -> ResultEngine<Transaction>;

    async fn delete(&self, id: Uuid) -> ResultEngine<()>;

    /// Deletes a batch of transactions, returning how many were removed.
    async fn delete_many(&self, ids: &[Uuid]) -> ResultEngine<u64>;

    /// Transactions matching the filter, ordered by `date` descending.
    async fn query(&self, query: &TransactionQuery) -> ResultEngine<Vec<Transaction>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, uid: &str) -> ResultEngine<Option<UserProfile>>;

    /// Inserts or fully overwrites a profile.
    async fn put(&self, profile: &UserProfile) -> ResultEngine<UserProfile>;
}
