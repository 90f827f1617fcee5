use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, EngineError, FileUpload, ImageInput, Money, SqlStore, TransactionInput,
    TransactionKind, TransactionQuery, UploadError, UploadGateway, Wallet, WalletInput,
    WalletStore,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn connect() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = connect().await;
    let engine = Engine::builder().database(db.clone()).build().unwrap();
    (engine, db)
}

struct FailingGateway;

#[async_trait]
impl UploadGateway for FailingGateway {
    async fn upload(&self, _file: &FileUpload, _folder: &str) -> Result<String, UploadError> {
        Err(UploadError::Operation("bucket unreachable".to_string()))
    }
}

fn income(wallet_id: Uuid, cents: i64) -> TransactionInput {
    TransactionInput {
        kind: Some(TransactionKind::Income),
        amount: Money::new(cents),
        wallet_id: Some(wallet_id),
        category: Some("salary".to_string()),
        ..Default::default()
    }
}

fn expense(wallet_id: Uuid, cents: i64) -> TransactionInput {
    TransactionInput {
        kind: Some(TransactionKind::Expense),
        amount: Money::new(cents),
        wallet_id: Some(wallet_id),
        category: Some("food".to_string()),
        ..Default::default()
    }
}

async fn funded_wallet(engine: &Engine, name: &str, cents: i64) -> Wallet {
    let wallet = engine
        .create_or_update_wallet(
            "alice",
            WalletInput {
                name: name.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    if cents > 0 {
        engine
            .create_or_update_transaction("alice", income(wallet.id, cents))
            .await
            .unwrap();
    }
    engine.wallet("alice", wallet.id).await.unwrap()
}

fn assert_totals(wallet: &Wallet, amount: i64, income: i64, expenses: i64) {
    assert_eq!(wallet.amount, Money::new(amount), "amount");
    assert_eq!(wallet.total_income, Money::new(income), "total_income");
    assert_eq!(wallet.total_expenses, Money::new(expenses), "total_expenses");
}

#[tokio::test]
async fn expense_reduces_balance_and_tracks_totals() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;
    assert_totals(&wallet, 100, 100, 0);

    let tx = engine
        .create_or_update_transaction("alice", expense(wallet.id, 30))
        .await
        .unwrap();
    assert_eq!(tx.uid, "alice");
    assert_eq!(tx.category.as_deref(), Some("food"));

    let wallet = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&wallet, 70, 100, 30);
}

#[tokio::test]
async fn expense_above_balance_is_rejected_without_writes() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;
    engine
        .create_or_update_transaction("alice", expense(wallet.id, 30))
        .await
        .unwrap();

    let err = engine
        .create_or_update_transaction("alice", expense(wallet.id, 80))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientFunds("Insufficient funds in wallet".to_string()));

    let after = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&after, 70, 100, 30);
    let stored = engine
        .list_transactions("alice", TransactionQuery::for_wallet(wallet.id))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn editing_amount_reconciles_totals() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(wallet.id, 30))
        .await
        .unwrap();

    let edited = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(wallet.id, 50)
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.id, tx.id);
    assert_eq!(edited.amount, Money::new(50));
    assert_eq!(edited.created, tx.created);

    let wallet = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&wallet, 50, 100, 50);
}

#[tokio::test]
async fn editing_above_reverted_balance_fails() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(wallet.id, 30))
        .await
        .unwrap();

    let err = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(wallet.id, 120)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let wallet = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&wallet, 70, 100, 30);
    let stored = engine.transaction("alice", tx.id).await.unwrap();
    assert_eq!(stored.amount, Money::new(30));
}

#[tokio::test]
async fn switching_type_reverts_then_applies() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;
    let bonus = engine
        .create_or_update_transaction("alice", income(wallet.id, 50))
        .await
        .unwrap();

    engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(bonus.id),
                ..expense(wallet.id, 50)
            },
        )
        .await
        .unwrap();

    let wallet = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&wallet, 50, 100, 50);
}

#[tokio::test]
async fn moving_expense_to_another_wallet() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 100).await;
    let bank = funded_wallet(&engine, "Bank", 50).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(cash.id, 30))
        .await
        .unwrap();

    let moved = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(bank.id, 30)
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.wallet_id, bank.id);

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    let bank = engine.wallet("alice", bank.id).await.unwrap();
    assert_totals(&cash, 100, 100, 0);
    assert_totals(&bank, 20, 50, 30);
}

#[tokio::test]
async fn moving_income_to_another_wallet() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 0).await;
    let bank = funded_wallet(&engine, "Bank", 20).await;
    let tx = engine
        .create_or_update_transaction("alice", income(cash.id, 100))
        .await
        .unwrap();

    engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..income(bank.id, 100)
            },
        )
        .await
        .unwrap();

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    let bank = engine.wallet("alice", bank.id).await.unwrap();
    assert_totals(&cash, 0, 0, 0);
    assert_totals(&bank, 120, 120, 0);
}

#[tokio::test]
async fn moving_spent_income_away_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 0).await;
    let bank = funded_wallet(&engine, "Bank", 0).await;
    let tx = engine
        .create_or_update_transaction("alice", income(cash.id, 100))
        .await
        .unwrap();
    engine
        .create_or_update_transaction("alice", expense(cash.id, 70))
        .await
        .unwrap();

    let err = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..income(bank.id, 100)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    let bank = engine.wallet("alice", bank.id).await.unwrap();
    assert_totals(&cash, 30, 100, 70);
    assert_totals(&bank, 0, 0, 0);
    let stored = engine.transaction("alice", tx.id).await.unwrap();
    assert_eq!(stored.wallet_id, cash.id);
}

#[tokio::test]
async fn changing_type_and_wallet_together() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 100).await;
    let bank = funded_wallet(&engine, "Bank", 100).await;
    let tx = engine
        .create_or_update_transaction("alice", income(cash.id, 50))
        .await
        .unwrap();

    let moved = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(bank.id, 50)
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.kind, TransactionKind::Expense);
    assert_eq!(moved.wallet_id, bank.id);

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    let bank = engine.wallet("alice", bank.id).await.unwrap();
    assert_totals(&cash, 100, 100, 0);
    assert_totals(&bank, 50, 100, 50);
}

#[tokio::test]
async fn turning_spent_income_into_foreign_expense_touches_nothing() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 0).await;
    let bank = funded_wallet(&engine, "Bank", 100).await;
    let tx = engine
        .create_or_update_transaction("alice", income(cash.id, 60))
        .await
        .unwrap();
    engine
        .create_or_update_transaction("alice", expense(cash.id, 40))
        .await
        .unwrap();

    let err = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(bank.id, 60)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    let bank = engine.wallet("alice", bank.id).await.unwrap();
    assert_totals(&cash, 20, 60, 40);
    assert_totals(&bank, 100, 100, 0);
}

#[tokio::test]
async fn moving_to_wallet_without_funds_touches_nothing() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 100).await;
    let bank = funded_wallet(&engine, "Bank", 10).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(cash.id, 30))
        .await
        .unwrap();

    let err = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(bank.id, 30)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    let bank = engine.wallet("alice", bank.id).await.unwrap();
    assert_totals(&cash, 70, 100, 30);
    assert_totals(&bank, 10, 10, 0);
}

#[tokio::test]
async fn description_only_edit_keeps_totals() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(wallet.id, 30))
        .await
        .unwrap();
    let before = engine.wallet("alice", wallet.id).await.unwrap();

    let edited = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                description: Some("  lunch with Bob ".to_string()),
                ..expense(wallet.id, 30)
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.description.as_deref(), Some("lunch with Bob"));
    assert_eq!(edited.date, tx.date);

    let after = engine.wallet("alice", wallet.id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn deleting_transactions_reverts_their_effect() {
    let (engine, _db) = engine_with_db().await;
    let wallet = engine
        .create_or_update_wallet(
            "alice",
            WalletInput {
                name: "Cash".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let salary = engine
        .create_or_update_transaction("alice", income(wallet.id, 100))
        .await
        .unwrap();
    let lunch = engine
        .create_or_update_transaction("alice", expense(wallet.id, 30))
        .await
        .unwrap();

    let deleted = engine
        .delete_transaction("alice", lunch.id, wallet.id)
        .await
        .unwrap();
    assert_eq!(deleted.id, lunch.id);
    let after_expense = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&after_expense, 100, 100, 0);

    engine
        .delete_transaction("alice", salary.id, wallet.id)
        .await
        .unwrap();
    let after_income = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&after_income, 0, 0, 0);

    let err = engine.transaction("alice", lunch.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn deleting_spent_income_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let wallet = engine
        .create_or_update_wallet(
            "alice",
            WalletInput {
                name: "Cash".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let salary = engine
        .create_or_update_transaction("alice", income(wallet.id, 100))
        .await
        .unwrap();
    engine
        .create_or_update_transaction("alice", expense(wallet.id, 80))
        .await
        .unwrap();

    let err = engine
        .delete_transaction("alice", salary.id, wallet.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let wallet = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&wallet, 20, 100, 80);
    assert!(engine.transaction("alice", salary.id).await.is_ok());
}

#[tokio::test]
async fn shrinking_spent_income_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 0).await;
    let salary = engine
        .create_or_update_transaction("alice", income(wallet.id, 100))
        .await
        .unwrap();
    engine
        .create_or_update_transaction("alice", expense(wallet.id, 80))
        .await
        .unwrap();

    let err = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(salary.id),
                ..income(wallet.id, 50)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let wallet = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&wallet, 20, 100, 80);
}

#[tokio::test]
async fn delete_requires_matching_wallet_and_owner() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 100).await;
    let bank = funded_wallet(&engine, "Bank", 0).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(cash.id, 30))
        .await
        .unwrap();

    let wrong_wallet = engine
        .delete_transaction("alice", tx.id, bank.id)
        .await
        .unwrap_err();
    assert!(matches!(wrong_wallet, EngineError::NotFound(_)));

    let wrong_user = engine
        .delete_transaction("bob", tx.id, cash.id)
        .await
        .unwrap_err();
    assert!(matches!(wrong_user, EngineError::NotFound(_)));

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    assert_totals(&cash, 70, 100, 30);
}

#[tokio::test]
async fn foreign_wallet_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;

    let err = engine
        .create_or_update_transaction("bob", income(wallet.id, 10))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("Wallet not found".to_string()));

    let missing = engine
        .create_or_update_transaction("alice", income(Uuid::new_v4(), 10))
        .await
        .unwrap_err();
    assert!(matches!(missing, EngineError::NotFound(_)));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_write() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;

    let no_category = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                category: Some("   ".to_string()),
                ..expense(wallet.id, 10)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(no_category, EngineError::Validation(_)));

    let zero = engine
        .create_or_update_transaction("alice", expense(wallet.id, 0))
        .await
        .unwrap_err();
    assert!(matches!(zero, EngineError::Validation(_)));

    let after = engine.wallet("alice", wallet.id).await.unwrap();
    assert_eq!(after, wallet);
}

#[tokio::test]
async fn image_url_is_stored_as_given() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;

    let tx = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                image: Some(ImageInput::Url("https://cdn.test/receipt.png".to_string())),
                ..expense(wallet.id, 10)
            },
        )
        .await
        .unwrap();
    assert_eq!(tx.image.as_deref(), Some("https://cdn.test/receipt.png"));

    // No image in the edit keeps the stored one.
    let edited = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(wallet.id, 15)
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.image, tx.image);
}

#[tokio::test]
async fn failed_upload_leaves_totals_written_but_no_transaction() {
    let db = connect().await;
    let engine = Engine::builder()
        .database(db.clone())
        .uploads(Arc::new(FailingGateway))
        .build()
        .unwrap();
    let wallet = funded_wallet(&engine, "Cash", 100).await;

    let err = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                image: Some(ImageInput::File(FileUpload {
                    file_name: "receipt.png".to_string(),
                    content_type: Some("image/png".to_string()),
                    bytes: vec![1, 2, 3],
                })),
                ..expense(wallet.id, 30)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Upload(_)));

    let wallet = engine.wallet("alice", wallet.id).await.unwrap();
    assert_totals(&wallet, 70, 100, 30);
    let stored = engine
        .list_transactions("alice", TransactionQuery::for_wallet(wallet.id))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn file_image_without_gateway_fails() {
    let (engine, _db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;

    let err = engine
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                image: Some(ImageInput::File(FileUpload {
                    file_name: "receipt.png".to_string(),
                    content_type: None,
                    bytes: vec![1],
                })),
                ..income(wallet.id, 5)
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Upload("Image uploads are not configured".to_string())
    );
}

#[tokio::test]
async fn stale_totals_write_is_a_conflict() {
    let (engine, db) = engine_with_db().await;
    let wallet = funded_wallet(&engine, "Cash", 100).await;
    let store = SqlStore::new(db);

    let mut first = WalletStore::get(&store, wallet.id).await.unwrap();
    let mut second = first.clone();

    first.amount = Money::new(90);
    let written = store.put_totals(&first).await.unwrap();
    assert_eq!(written.version, wallet.version + 1);

    second.amount = Money::new(80);
    let err = store.put_totals(&second).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let stored = engine.wallet("alice", wallet.id).await.unwrap();
    assert_eq!(stored.amount, Money::new(90));
}

/// Wallet store where another writer spends from `target` just before the
/// first totals write lands.
struct RacingWallets {
    inner: SqlStore,
    target: Uuid,
    spend: Money,
    raced: AtomicBool,
}

impl RacingWallets {
    fn new(db: DatabaseConnection, target: Uuid, cents: i64) -> Self {
        Self {
            inner: SqlStore::new(db),
            target,
            spend: Money::new(cents),
            raced: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl WalletStore for RacingWallets {
    async fn get(&self, id: Uuid) -> Result<Wallet, EngineError> {
        WalletStore::get(&self.inner, id).await
    }

    async fn put(&self, wallet: &Wallet) -> Result<Wallet, EngineError> {
        WalletStore::put(&self.inner, wallet).await
    }

    async fn put_totals(&self, wallet: &Wallet) -> Result<Wallet, EngineError> {
        if !self.raced.swap(true, Ordering::SeqCst) {
            let mut other = WalletStore::get(&self.inner, self.target).await?;
            let spent = other.totals().apply(TransactionKind::Expense, self.spend)?;
            other.set_totals(spent);
            self.inner.put_totals(&other).await?;
        }
        self.inner.put_totals(wallet).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), EngineError> {
        WalletStore::delete(&self.inner, id).await
    }

    async fn list(&self, uid: &str) -> Result<Vec<Wallet>, EngineError> {
        self.inner.list(uid).await
    }
}

fn racing_engine(db: DatabaseConnection, target: Uuid, cents: i64) -> Engine {
    Engine::builder()
        .database(db.clone())
        .wallets(Arc::new(RacingWallets::new(db, target, cents)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn spend_racing_a_move_keeps_destination_non_negative() {
    let (engine, db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 100).await;
    let bank = funded_wallet(&engine, "Bank", 100).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(cash.id, 50))
        .await
        .unwrap();

    let racing = racing_engine(db, bank.id, 80);
    let err = racing
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(bank.id, 50)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let bank = engine.wallet("alice", bank.id).await.unwrap();
    assert_totals(&bank, 20, 100, 80);
    let stored = engine.transaction("alice", tx.id).await.unwrap();
    assert_eq!(stored.wallet_id, cash.id);
}

#[tokio::test]
async fn spend_racing_an_edit_is_a_conflict() {
    let (engine, db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 100).await;
    let tx = engine
        .create_or_update_transaction("alice", expense(cash.id, 30))
        .await
        .unwrap();

    let racing = racing_engine(db, cash.id, 50);
    let err = racing
        .create_or_update_transaction(
            "alice",
            TransactionInput {
                id: Some(tx.id),
                ..expense(cash.id, 90)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let cash = engine.wallet("alice", cash.id).await.unwrap();
    assert_totals(&cash, 20, 100, 80);
    let stored = engine.transaction("alice", tx.id).await.unwrap();
    assert_eq!(stored.amount, Money::new(30));
}

#[tokio::test]
async fn list_filters_by_wallet_and_range() {
    let (engine, _db) = engine_with_db().await;
    let cash = funded_wallet(&engine, "Cash", 0).await;
    let bank = funded_wallet(&engine, "Bank", 0).await;
    let now = Utc::now();

    for days in [0, 2, 5] {
        engine
            .create_or_update_transaction(
                "alice",
                TransactionInput {
                    date: Some(now - Duration::days(days)),
                    ..income(cash.id, 10)
                },
            )
            .await
            .unwrap();
    }
    engine
        .create_or_update_transaction("alice", income(bank.id, 10))
        .await
        .unwrap();

    let cash_txs = engine
        .list_transactions("alice", TransactionQuery::for_wallet(cash.id))
        .await
        .unwrap();
    assert_eq!(cash_txs.len(), 3);
    assert!(cash_txs.windows(2).all(|pair| pair[0].date >= pair[1].date));

    let recent = engine
        .list_transactions(
            "alice",
            TransactionQuery::for_wallet(cash.id).between(now - Duration::days(3), now + Duration::seconds(1)),
        )
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);

    let limited = engine
        .list_transactions("alice", TransactionQuery::default().limit(2))
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    let foreign = engine
        .list_transactions("bob", TransactionQuery::for_wallet(cash.id))
        .await
        .unwrap();
    assert!(foreign.is_empty());
}
