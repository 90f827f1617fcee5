//! Transaction primitives.
//!
//! A `Transaction` is an income or an expense posted against exactly one
//! wallet. The amount is always a positive magnitude; its sign comes from the
//! kind.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, upload::ImageInput};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "Invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Owner of the transaction.
    pub uid: String,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Date the transaction is attributed to (used for statistics).
    pub date: DateTime<Utc>,
    pub image: Option<String>,
    pub created: DateTime<Utc>,
}

/// Request to create or edit a transaction.
///
/// Without `id` a new transaction is created. With `id` the existing record
/// is edited: `None` descriptive fields keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct TransactionInput {
    pub id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub amount: Money,
    pub wallet_id: Option<Uuid>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub image: Option<ImageInput>,
}

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
/// Results are always ordered by `date` descending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub uid: Option<String>,
    pub wallet_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

impl TransactionQuery {
    pub fn for_user(uid: &str) -> Self {
        Self {
            uid: Some(uid.to_string()),
            ..Default::default()
        }
    }

    pub fn for_wallet(wallet_id: Uuid) -> Self {
        Self {
            wallet_id: Some(wallet_id),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub uid: String,
    pub wallet_id: String,
    pub kind: String,
    pub amount: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: DateTimeUtc,
    pub image: Option<String>,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            uid: ActiveValue::Set(tx.uid.clone()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount: ActiveValue::Set(tx.amount.cents()),
            category: ActiveValue::Set(tx.category.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date),
            image: ActiveValue::Set(tx.image.clone()),
            created: ActiveValue::Set(tx.created),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "transaction")?,
            uid: model.uid,
            wallet_id: crate::util::parse_uuid(&model.wallet_id, "wallet")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: Money::new(model.amount),
            category: model.category,
            description: model.description,
            date: model.date,
            image: model.image,
            created: model.created,
        })
    }
}
