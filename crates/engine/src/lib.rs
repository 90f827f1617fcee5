//! Wallet ledger engine.
//!
//! The engine keeps each wallet's cached balance and lifetime totals in step
//! with the transactions posted against it, and folds transactions into
//! weekly, monthly or yearly statistics.

pub use error::EngineError;
pub use money::Money;
pub use ops::{Balance, Engine, EngineBuilder, UserUpdate, WalletInput};
pub use response::Response;
pub use sql::SqlStore;
pub use statistics::{Bucket, Statistics, StatsWindow};
pub use store::{TransactionStore, UserStore, WalletStore};
pub use transactions::{Transaction, TransactionInput, TransactionKind, TransactionQuery};
pub use upload::{FileUpload, ImageInput, OpendalUploadGateway, UploadError, UploadGateway};
pub use users::UserProfile;
pub use wallets::{Wallet, WalletTotals};

mod error;
mod money;
mod ops;
mod response;
mod sql;
pub mod statistics;
mod store;
mod transactions;
pub mod upload;
mod users;
mod util;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
