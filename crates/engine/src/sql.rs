//! sea-orm backed stores.
//!
//! One [`SqlStore`] implements every store trait over the same connection.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionQuery, UserProfile, Wallet,
    store::{TransactionStore, UserStore, WalletStore},
    transactions, users, wallets,
};

#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    async fn find_wallet(&self, id: Uuid) -> ResultEngine<Option<wallets::Model>> {
        Ok(wallets::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?)
    }
}

#[async_trait]
impl WalletStore for SqlStore {
    async fn get(&self, id: Uuid) -> ResultEngine<Wallet> {
        let model = self
            .find_wallet(id)
            .await?
            .ok_or_else(EngineError::wallet_not_found)?;
        Wallet::try_from(model)
    }

    async fn put(&self, wallet: &Wallet) -> ResultEngine<Wallet> {
        let model = if self.find_wallet(wallet.id).await?.is_some() {
            wallets::ActiveModel {
                id: ActiveValue::Set(wallet.id.to_string()),
                name: ActiveValue::Set(wallet.name.clone()),
                image: ActiveValue::Set(wallet.image.clone()),
                ..Default::default()
            }
            .update(&self.database)
            .await?
        } else {
            wallets::ActiveModel::from(wallet)
                .insert(&self.database)
                .await?
        };
        Wallet::try_from(model)
    }

    async fn put_totals(&self, wallet: &Wallet) -> ResultEngine<Wallet> {
        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::Amount, Expr::value(wallet.amount.cents()))
            .col_expr(
                wallets::Column::TotalIncome,
                Expr::value(wallet.total_income.cents()),
            )
            .col_expr(
                wallets::Column::TotalExpenses,
                Expr::value(wallet.total_expenses.cents()),
            )
            .col_expr(wallets::Column::Version, Expr::value(wallet.version + 1))
            .filter(wallets::Column::Id.eq(wallet.id.to_string()))
            .filter(wallets::Column::Version.eq(wallet.version))
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return match self.find_wallet(wallet.id).await? {
                None => Err(EngineError::wallet_not_found()),
                Some(stored) => {
                    tracing::warn!(
                        wallet_id = %wallet.id,
                        expected = wallet.version,
                        found = stored.version,
                        "wallet version mismatch"
                    );
                    Err(EngineError::Conflict(
                        "Wallet was modified concurrently, please retry".to_string(),
                    ))
                }
            };
        }

        WalletStore::get(self, wallet.id).await
    }

    async fn delete(&self, id: Uuid) -> ResultEngine<()> {
        wallets::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn list(&self, uid: &str) -> ResultEngine<Vec<Wallet>> {
        wallets::Entity::find()
            .filter(wallets::Column::Uid.eq(uid))
            .order_by_desc(wallets::Column::Created)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }
}

#[async_trait]
impl TransactionStore for SqlStore {
    async fn get(&self, id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(EngineError::transaction_not_found)?;
        Transaction::try_from(model)
    }

    async fn put(&self, transaction: &Transaction) -> ResultEngine<Transaction> {
        let exists = transactions::Entity::find_by_id(transaction.id.to_string())
            .one(&self.database)
            .await?
            .is_some();
        let active = transactions::ActiveModel::from(transaction);
        let model = if exists {
            active.update(&self.database).await?
        } else {
            active.insert(&self.database).await?
        };
        Transaction::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> ResultEngine<()> {
        transactions::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> ResultEngine<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.is_in(ids))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    async fn query(&self, query: &TransactionQuery) -> ResultEngine<Vec<Transaction>> {
        let mut select = transactions::Entity::find();
        if let Some(uid) = &query.uid {
            select = select.filter(transactions::Column::Uid.eq(uid.as_str()));
        }
        if let Some(wallet_id) = query.wallet_id {
            select = select.filter(transactions::Column::WalletId.eq(wallet_id.to_string()));
        }
        if let Some(from) = query.from {
            select = select.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(transactions::Column::Date.lt(to));
        }
        select = select
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id);
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        select
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}

#[async_trait]
impl UserStore for SqlStore {
    async fn get(&self, uid: &str) -> ResultEngine<Option<UserProfile>> {
        Ok(users::Entity::find_by_id(uid.to_string())
            .one(&self.database)
            .await?
            .map(UserProfile::from))
    }

    async fn put(&self, profile: &UserProfile) -> ResultEngine<UserProfile> {
        let exists = users::Entity::find_by_id(profile.uid.clone())
            .one(&self.database)
            .await?
            .is_some();
        let active = users::ActiveModel::from(profile);
        let model = if exists {
            active.update(&self.database).await?
        } else {
            active.insert(&self.database).await?
        };
        Ok(UserProfile::from(model))
    }
}
