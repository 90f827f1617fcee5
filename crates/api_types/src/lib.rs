use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod image {
    use super::*;

    /// An image either already hosted or sent inline.
    ///
    /// Either `{ "url": ... }` or `{ "file_name", "content_type", "data_base64" }`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum ImagePayload {
        Url {
            url: String,
        },
        File {
            file_name: String,
            content_type: Option<String>,
            /// File bytes, standard base64 alphabet.
            data_base64: String,
        },
    }
}

pub mod wallet {
    use super::*;
    use crate::image::ImagePayload;

    /// Request body for creating (no `id`) or renaming a wallet.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletUpsert {
        pub id: Option<Uuid>,
        pub name: String,
        pub image: Option<ImagePayload>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub image: Option<String>,
        pub created: DateTime<FixedOffset>,
    }

    /// Sum over every wallet of the user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub amount_minor: i64,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
    }
}

pub mod transaction {
    use super::*;
    use crate::image::ImagePayload;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Request body for creating (no `id`) or editing a transaction.
    ///
    /// On edit, absent optional fields keep their stored value.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpsert {
        pub id: Option<Uuid>,
        pub kind: TransactionKind,
        /// Must be > 0.
        pub amount_minor: i64,
        pub wallet_id: Uuid,
        pub category: Option<String>,
        pub description: Option<String>,
        /// RFC3339 timestamp. Defaults to now for new transactions.
        pub date: Option<DateTime<FixedOffset>>,
        pub image: Option<ImagePayload>,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub wallet_id: Option<Uuid>,
        /// Inclusive lower bound on `date`.
        pub from: Option<DateTime<FixedOffset>>,
        /// Exclusive upper bound on `date`.
        pub to: Option<DateTime<FixedOffset>>,
        pub limit: Option<u64>,
    }

    /// Query string of `DELETE /transactions/{id}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDelete {
        pub wallet_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category: Option<String>,
        pub description: Option<String>,
        pub date: DateTime<FixedOffset>,
        pub image: Option<String>,
        pub created: DateTime<FixedOffset>,
    }
}

pub mod stats {
    use super::*;
    use crate::transaction::TransactionView;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StatsWindow {
        #[default]
        Weekly,
        Monthly,
        Yearly,
    }

    /// Query string of `GET /statistics`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatisticsQuery {
        #[serde(default)]
        pub window: StatsWindow,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BucketView {
        pub start: NaiveDate,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatisticsView {
        pub window: StatsWindow,
        /// Oldest first.
        pub buckets: Vec<BucketView>,
        pub transactions: Vec<TransactionView>,
    }
}

pub mod user {
    use super::*;
    use crate::image::ImagePayload;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserRegister {
        pub email: Option<String>,
        pub name: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserPatch {
        pub name: Option<String>,
        pub image: Option<ImagePayload>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub uid: String,
        pub email: Option<String>,
        pub name: Option<String>,
        pub image: Option<String>,
    }
}
