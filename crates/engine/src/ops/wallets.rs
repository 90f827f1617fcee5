use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Money, ResultEngine, TransactionQuery, Wallet,
    upload::{ImageInput, WALLETS_FOLDER},
    util::normalize_required_text,
};

use super::Engine;

/// Fields a user may set on a wallet. Totals are never accepted from the
/// outside.
#[derive(Clone, Debug, Default)]
pub struct WalletInput {
    /// Existing wallet to rename, `None` to create one.
    pub id: Option<Uuid>,
    pub name: String,
    pub image: Option<ImageInput>,
}

/// Sum of all wallets of a user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Money,
    pub total_income: Money,
    pub total_expenses: Money,
}

impl Engine {
    /// Creates a wallet with zeroed totals, or renames an existing one.
    ///
    /// Updates only touch `name` and `image`.
    pub async fn create_or_update_wallet(
        &self,
        uid: &str,
        input: WalletInput,
    ) -> ResultEngine<Wallet> {
        let name = normalize_required_text(&input.name, "Wallet name")?;

        let mut wallet = match input.id {
            Some(id) => {
                let mut wallet = self.owned_wallet(uid, id).await?;
                wallet.name = name;
                wallet
            }
            None => Wallet::new(uid.to_string(), name, Utc::now()),
        };
        if let Some(image) = &input.image {
            wallet.image = Some(self.resolve_image(image, WALLETS_FOLDER).await?);
        }

        let saved = self.wallets.put(&wallet).await?;
        tracing::info!(
            wallet_id = %saved.id,
            created = input.id.is_none(),
            "wallet saved"
        );
        Ok(saved)
    }

    pub async fn wallet(&self, uid: &str, id: Uuid) -> ResultEngine<Wallet> {
        self.owned_wallet(uid, id).await
    }

    /// Wallets of the user, newest first.
    pub async fn wallets(&self, uid: &str) -> ResultEngine<Vec<Wallet>> {
        self.wallets.list(uid).await
    }

    /// Deletes a wallet together with all of its transactions.
    ///
    /// Transactions go first, in batches; the wallet record is removed last
    /// so an interrupted delete can simply be retried.
    pub async fn delete_wallet(&self, uid: &str, id: Uuid) -> ResultEngine<()> {
        let wallet = self.owned_wallet(uid, id).await?;

        let batch = TransactionQuery::for_wallet(wallet.id).limit(self.cascade_batch);
        let mut removed = 0u64;
        loop {
            let ids: Vec<Uuid> = self
                .transactions
                .query(&batch)
                .await?
                .into_iter()
                .map(|tx| tx.id)
                .collect();
            if ids.is_empty() {
                break;
            }
            removed += self.transactions.delete_many(&ids).await?;
            tracing::debug!(wallet_id = %wallet.id, removed, "deleted transaction batch");
        }

        self.wallets.delete(wallet.id).await?;
        tracing::info!(wallet_id = %wallet.id, removed, "wallet deleted");
        Ok(())
    }

    /// Balance and lifetime totals summed over every wallet of the user.
    pub async fn balance(&self, uid: &str) -> ResultEngine<Balance> {
        let wallets = self.wallets.list(uid).await?;
        wallets.iter().try_fold(Balance::default(), |acc, wallet| {
            Ok(Balance {
                amount: acc.amount.try_add(wallet.amount)?,
                total_income: acc.total_income.try_add(wallet.total_income)?,
                total_expenses: acc.total_expenses.try_add(wallet.total_expenses)?,
            })
        })
    }
}
