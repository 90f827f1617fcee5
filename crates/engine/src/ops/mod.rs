use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    EngineError, ResultEngine, SqlStore, TransactionStore, UserStore, WalletStore,
    upload::{ImageInput, UploadGateway},
};

mod statistics;
mod transactions;
mod users;
mod wallets;

pub use users::UserUpdate;
pub use wallets::{Balance, WalletInput};

/// Transactions removed per round when a wallet is deleted.
const CASCADE_BATCH: u64 = 500;

/// Entry point of the ledger.
///
/// Holds the stores and the upload gateway it was built with; it keeps no
/// state of its own, so it can be shared freely behind an `Arc`.
pub struct Engine {
    wallets: Arc<dyn WalletStore>,
    transactions: Arc<dyn TransactionStore>,
    users: Arc<dyn UserStore>,
    uploads: Option<Arc<dyn UploadGateway>>,
    cascade_batch: u64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("uploads", &self.uploads.is_some())
            .field("cascade_batch", &self.cascade_batch)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Resolves an image input to the URL to store.
    ///
    /// URLs pass through untouched; files go to the upload gateway.
    async fn resolve_image(&self, image: &ImageInput, folder: &str) -> ResultEngine<String> {
        match image {
            ImageInput::Url(url) => Ok(url.clone()),
            ImageInput::File(file) => {
                let gateway = self.uploads.as_ref().ok_or_else(|| {
                    EngineError::Upload("Image uploads are not configured".to_string())
                })?;
                gateway.upload(file, folder).await.map_err(|err| {
                    tracing::warn!(folder, "image upload failed: {err}");
                    EngineError::Upload(err.to_string())
                })
            }
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    wallets: Option<Arc<dyn WalletStore>>,
    transactions: Option<Arc<dyn TransactionStore>>,
    users: Option<Arc<dyn UserStore>>,
    uploads: Option<Arc<dyn UploadGateway>>,
    cascade_batch: Option<u64>,
}

impl EngineBuilder {
    /// Back every store with the given database.
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        let store = Arc::new(SqlStore::new(db));
        self.wallets(store.clone())
            .transactions(store.clone())
            .users(store)
    }

    pub fn wallets(mut self, store: Arc<dyn WalletStore>) -> EngineBuilder {
        self.wallets = Some(store);
        self
    }

    pub fn transactions(mut self, store: Arc<dyn TransactionStore>) -> EngineBuilder {
        self.transactions = Some(store);
        self
    }

    pub fn users(mut self, store: Arc<dyn UserStore>) -> EngineBuilder {
        self.users = Some(store);
        self
    }

    /// Gateway used for wallet icons, avatars and receipts.
    ///
    /// Without one, file images are rejected with an upload error.
    pub fn uploads(mut self, gateway: Arc<dyn UploadGateway>) -> EngineBuilder {
        self.uploads = Some(gateway);
        self
    }

    /// Transactions removed per round by `delete_wallet`. Defaults to 500.
    pub fn cascade_batch(mut self, size: u64) -> EngineBuilder {
        self.cascade_batch = Some(size);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let missing = |what: &str| EngineError::Validation(format!("missing {what} store"));
        let cascade_batch = self.cascade_batch.unwrap_or(CASCADE_BATCH);
        if cascade_batch == 0 {
            return Err(EngineError::Validation(
                "cascade batch must be positive".to_string(),
            ));
        }
        Ok(Engine {
            wallets: self.wallets.ok_or_else(|| missing("wallet"))?,
            transactions: self.transactions.ok_or_else(|| missing("transaction"))?,
            users: self.users.ok_or_else(|| missing("user"))?,
            uploads: self.uploads,
            cascade_batch,
        })
    }
}
