//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, TransactionKind};

/// A wallet.
///
/// A wallet is where a user keeps money: cash, a bank account, a savings
/// jar. Its `amount`, `total_income` and `total_expenses` are a cache of the
/// transactions posted against it and are only ever changed through the
/// ledger reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    /// Owner of the wallet.
    pub uid: String,
    pub name: String,
    /// Current balance.
    pub amount: Money,
    pub total_income: Money,
    pub total_expenses: Money,
    pub image: Option<String>,
    pub created: DateTime<Utc>,
    /// Optimistic concurrency counter, bumped on every totals write.
    pub version: i64,
}

impl Wallet {
    pub fn new(uid: String, name: String, created: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            uid,
            name,
            amount: Money::ZERO,
            total_income: Money::ZERO,
            total_expenses: Money::ZERO,
            image: None,
            created,
            version: 0,
        }
    }

    /// Returns the cached numeric state of the wallet.
    pub fn totals(&self) -> WalletTotals {
        WalletTotals {
            amount: self.amount,
            total_income: self.total_income,
            total_expenses: self.total_expenses,
        }
    }

    pub fn set_totals(&mut self, totals: WalletTotals) {
        self.amount = totals.amount;
        self.total_income = totals.total_income;
        self.total_expenses = totals.total_expenses;
    }
}

/// Balance and lifetime totals of a wallet.
///
/// Income adds to `amount` and `total_income`; expense subtracts from
/// `amount` and adds to `total_expenses`. Reverting does the opposite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalletTotals {
    pub amount: Money,
    pub total_income: Money,
    pub total_expenses: Money,
}

impl WalletTotals {
    /// Posts the effect of a transaction.
    pub fn apply(self, kind: TransactionKind, amount: Money) -> ResultEngine<Self> {
        match kind {
            TransactionKind::Income => Ok(Self {
                amount: self.amount.try_add(amount)?,
                total_income: self.total_income.try_add(amount)?,
                ..self
            }),
            TransactionKind::Expense => Ok(Self {
                amount: self.amount.try_sub(amount)?,
                total_expenses: self.total_expenses.try_add(amount)?,
                ..self
            }),
        }
    }

    /// Removes the effect of a previously posted transaction.
    pub fn revert(self, kind: TransactionKind, amount: Money) -> ResultEngine<Self> {
        match kind {
            TransactionKind::Income => Ok(Self {
                amount: self.amount.try_sub(amount)?,
                total_income: self.total_income.try_sub(amount)?,
                ..self
            }),
            TransactionKind::Expense => Ok(Self {
                amount: self.amount.try_add(amount)?,
                total_expenses: self.total_expenses.try_sub(amount)?,
                ..self
            }),
        }
    }

    /// Fails when the balance or a lifetime total went below zero.
    pub fn ensure_non_negative(self) -> ResultEngine<Self> {
        if self.amount.is_negative() {
            return Err(EngineError::InvariantViolation(
                "This change would leave the wallet with a negative balance".to_string(),
            ));
        }
        if self.total_income.is_negative() || self.total_expenses.is_negative() {
            return Err(EngineError::InvariantViolation(
                "Wallet totals are out of sync with its transactions".to_string(),
            ));
        }
        Ok(self)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub uid: String,
    pub name: String,
    pub amount: i64,
    pub total_income: i64,
    pub total_expenses: i64,
    pub image: Option<String>,
    pub created: DateTimeUtc,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            uid: ActiveValue::Set(value.uid.clone()),
            name: ActiveValue::Set(value.name.clone()),
            amount: ActiveValue::Set(value.amount.cents()),
            total_income: ActiveValue::Set(value.total_income.cents()),
            total_expenses: ActiveValue::Set(value.total_expenses.cents()),
            image: ActiveValue::Set(value.image.clone()),
            created: ActiveValue::Set(value.created),
            version: ActiveValue::Set(value.version),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "wallet")?,
            uid: model.uid,
            name: model.name,
            amount: Money::new(model.amount),
            total_income: Money::new(model.total_income),
            total_expenses: Money::new(model.total_expenses),
            image: model.image,
            created: model.created,
            version: model.version,
        })
    }
}
