use chrono::Utc;
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine, Transaction, TransactionInput, TransactionKind,
    TransactionQuery, Wallet,
    upload::TRANSACTIONS_FOLDER,
    util::normalize_optional_text,
};

use super::Engine;

/// Required fields of a transaction input, checked before any I/O.
struct Validated {
    kind: TransactionKind,
    wallet_id: Uuid,
    amount: Money,
}

fn validate_input(input: &TransactionInput) -> ResultEngine<Validated> {
    if !input.amount.is_positive() {
        return Err(EngineError::Validation(
            "Amount must be greater than zero".to_string(),
        ));
    }
    let wallet_id = input
        .wallet_id
        .ok_or_else(|| EngineError::Validation("Wallet is required".to_string()))?;
    let kind = input
        .kind
        .ok_or_else(|| EngineError::Validation("Transaction type is required".to_string()))?;
    Ok(Validated {
        kind,
        wallet_id,
        amount: input.amount,
    })
}

fn rejected(err: EngineError, wallet_id: Uuid) -> EngineError {
    tracing::warn!(%wallet_id, "transaction rejected: {err}");
    err
}

impl Engine {
    pub(super) async fn owned_wallet(&self, uid: &str, wallet_id: Uuid) -> ResultEngine<Wallet> {
        let wallet = self.wallets.get(wallet_id).await?;
        if wallet.uid != uid {
            return Err(EngineError::wallet_not_found());
        }
        Ok(wallet)
    }

    async fn owned_transaction(&self, uid: &str, id: Uuid) -> ResultEngine<Transaction> {
        let transaction = self.transactions.get(id).await?;
        if transaction.uid != uid {
            return Err(EngineError::transaction_not_found());
        }
        Ok(transaction)
    }

    /// Creates a transaction, or edits the one named by `input.id`.
    ///
    /// Wallet totals are reconciled first, then the optional receipt is
    /// uploaded, then the transaction is written. Every guard runs before
    /// the first wallet write. A failed upload happens after the wallet
    /// writes: totals are already updated while the transaction is not
    /// saved.
    pub async fn create_or_update_transaction(
        &self,
        uid: &str,
        input: TransactionInput,
    ) -> ResultEngine<Transaction> {
        let valid = validate_input(&input)?;

        let prior = match input.id {
            Some(id) => Some(self.owned_transaction(uid, id).await?),
            None => None,
        };

        let category = normalize_optional_text(input.category.as_deref())
            .or_else(|| prior.as_ref().and_then(|p| p.category.clone()));
        if valid.kind == TransactionKind::Expense && category.is_none() {
            return Err(EngineError::Validation(
                "Category is required for expenses".to_string(),
            ));
        }

        match &prior {
            Some(prior) => self.reconcile_update(uid, prior, &valid).await?,
            None => self.reconcile_new(uid, &valid).await?,
        }

        let image = match &input.image {
            Some(image) => Some(self.resolve_image(image, TRANSACTIONS_FOLDER).await?),
            None => prior.as_ref().and_then(|p| p.image.clone()),
        };
        let description = normalize_optional_text(input.description.as_deref())
            .or_else(|| prior.as_ref().and_then(|p| p.description.clone()));

        let now = Utc::now();
        let record = Transaction {
            id: prior.as_ref().map_or_else(Uuid::new_v4, |p| p.id),
            uid: uid.to_string(),
            wallet_id: valid.wallet_id,
            kind: valid.kind,
            amount: valid.amount,
            category,
            description,
            date: input
                .date
                .or_else(|| prior.as_ref().map(|p| p.date))
                .unwrap_or(now),
            image,
            created: prior.as_ref().map_or(now, |p| p.created),
        };

        let saved = self.transactions.put(&record).await?;
        tracing::info!(
            transaction_id = %saved.id,
            wallet_id = %saved.wallet_id,
            kind = saved.kind.as_str(),
            amount = %saved.amount,
            updated = prior.is_some(),
            "transaction saved"
        );
        Ok(saved)
    }

    /// Posts a brand new transaction on its wallet.
    async fn reconcile_new(&self, uid: &str, valid: &Validated) -> ResultEngine<()> {
        let mut wallet = self.owned_wallet(uid, valid.wallet_id).await?;

        if valid.kind == TransactionKind::Expense && wallet.amount < valid.amount {
            return Err(rejected(EngineError::insufficient_funds(), wallet.id));
        }

        let totals = wallet.totals().apply(valid.kind, valid.amount)?;
        wallet.set_totals(totals);
        self.wallets.put_totals(&wallet).await?;
        Ok(())
    }

    /// Reverts the prior effect of an edited transaction and posts the new
    /// one, possibly on another wallet.
    async fn reconcile_update(
        &self,
        uid: &str,
        prior: &Transaction,
        valid: &Validated,
    ) -> ResultEngine<()> {
        if prior.kind == valid.kind
            && prior.wallet_id == valid.wallet_id
            && prior.amount == valid.amount
        {
            tracing::debug!(
                transaction_id = %prior.id,
                "no amount, type or wallet change, totals untouched"
            );
            return Ok(());
        }

        let mut source = self.owned_wallet(uid, prior.wallet_id).await?;
        let reverted = source.totals().revert(prior.kind, prior.amount)?;

        tracing::debug!(
            transaction_id = %prior.id,
            from = %prior.wallet_id,
            to = %valid.wallet_id,
            "reverting prior effect"
        );

        // Every write below carries the version read alongside the checked
        // totals, so a concurrent write surfaces as a conflict.
        if prior.wallet_id == valid.wallet_id {
            if valid.kind == TransactionKind::Expense && reverted.amount < valid.amount {
                return Err(rejected(EngineError::insufficient_funds(), source.id));
            }
            let applied = reverted
                .apply(valid.kind, valid.amount)?
                .ensure_non_negative()
                .map_err(|err| rejected(err, source.id))?;
            source.set_totals(applied);
            self.wallets.put_totals(&source).await?;
            return Ok(());
        }

        let mut destination = self.owned_wallet(uid, valid.wallet_id).await?;
        if valid.kind == TransactionKind::Expense && destination.amount < valid.amount {
            return Err(rejected(EngineError::insufficient_funds(), destination.id));
        }
        reverted
            .ensure_non_negative()
            .map_err(|err| rejected(err, source.id))?;
        let applied = destination.totals().apply(valid.kind, valid.amount)?;

        source.set_totals(reverted);
        self.wallets.put_totals(&source).await?;
        destination.set_totals(applied);
        self.wallets.put_totals(&destination).await?;
        Ok(())
    }

    /// Deletes a transaction and removes its effect from the wallet.
    ///
    /// Returns the deleted transaction.
    pub async fn delete_transaction(
        &self,
        uid: &str,
        transaction_id: Uuid,
        wallet_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let transaction = self.owned_transaction(uid, transaction_id).await?;
        if transaction.wallet_id != wallet_id {
            return Err(EngineError::transaction_not_found());
        }

        let mut wallet = self.owned_wallet(uid, wallet_id).await?;
        let reverted = wallet
            .totals()
            .revert(transaction.kind, transaction.amount)?
            .ensure_non_negative()
            .map_err(|err| rejected(err, wallet_id))?;

        wallet.set_totals(reverted);
        self.wallets.put_totals(&wallet).await?;
        self.transactions.delete(transaction.id).await?;

        tracing::info!(
            %transaction_id,
            %wallet_id,
            kind = transaction.kind.as_str(),
            amount = %transaction.amount,
            "transaction deleted"
        );
        Ok(transaction)
    }

    pub async fn transaction(&self, uid: &str, id: Uuid) -> ResultEngine<Transaction> {
        self.owned_transaction(uid, id).await
    }

    /// Lists the user's transactions, newest first.
    ///
    /// The `uid` of the query is always replaced with the acting user.
    pub async fn list_transactions(
        &self,
        uid: &str,
        mut query: TransactionQuery,
    ) -> ResultEngine<Vec<Transaction>> {
        if let (Some(from), Some(to)) = (query.from, query.to)
            && from >= to
        {
            return Err(EngineError::Validation(
                "Invalid range: from must be before to".to_string(),
            ));
        }
        query.uid = Some(uid.to_string());
        self.transactions.query(&query).await
    }
}
