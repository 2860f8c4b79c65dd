use chrono::{Duration, Utc};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    Category, CreateBudgetCmd, CreateTransactionCmd, DbStore, Engine, EngineError, Money,
    TransactionKind, UpsertWalletCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine<DbStore>, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .store(DbStore::new(db.clone()))
        .build()
        .unwrap();
    (engine, db)
}

async fn funded_wallet(engine: &Engine<DbStore>, uid: &str, amount_minor: i64) -> Uuid {
    let wallet_id = engine
        .create_or_update_wallet(UpsertWalletCmd::new(uid, "Cash"))
        .await
        .unwrap()
        .id;
    engine
        .create_transaction(CreateTransactionCmd::new(
            uid,
            wallet_id,
            TransactionKind::Income,
            Money::new(amount_minor),
            Utc::now(),
        ))
        .await
        .unwrap();
    wallet_id
}

fn dining_budget_cmd(uid: &str, limit_minor: i64) -> CreateBudgetCmd {
    let today = Utc::now().date_naive();
    CreateBudgetCmd::new(
        uid,
        Category::Dining,
        Money::new(limit_minor),
        today - Duration::days(10),
        today + Duration::days(10),
    )
}

async fn dining_expense(
    engine: &Engine<DbStore>,
    uid: &str,
    wallet_id: Uuid,
    amount_minor: i64,
    days_ago: i64,
) -> Uuid {
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                uid,
                wallet_id,
                TransactionKind::Expense,
                Money::new(amount_minor),
                Utc::now() - Duration::days(days_ago),
            )
            .category(Category::Dining),
        )
        .await
        .unwrap()
        .transaction
        .id
}

#[tokio::test]
async fn create_budget_validates_limit_and_window() {
    let (engine, _db) = engine_with_db().await;
    let today = Utc::now().date_naive();

    let err = engine
        .create_budget(CreateBudgetCmd::new(
            "alice",
            Category::Dining,
            Money::ZERO,
            today,
            today,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("limit_minor must be > 0".to_string())
    );

    let err = engine
        .create_budget(CreateBudgetCmd::new(
            "alice",
            Category::Dining,
            Money::new(5000),
            today,
            today - Duration::days(1),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("window_start must not be after window_end".to_string())
    );
}

#[tokio::test]
async fn catch_up_scan_initializes_spent_from_existing_expenses() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, "alice", 50000).await;

    // Two dining expenses inside the window, one outside, one voided, and
    // one in a different category.
    dining_expense(&engine, "alice", wallet_id, 1000, 0).await;
    dining_expense(&engine, "alice", wallet_id, 2000, 5).await;
    dining_expense(&engine, "alice", wallet_id, 4000, 40).await;
    let voided = dining_expense(&engine, "alice", wallet_id, 500, 1).await;
    engine.void_transaction("alice", voided).await.unwrap();
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                wallet_id,
                TransactionKind::Expense,
                Money::new(3000),
                Utc::now(),
            )
            .category(Category::Groceries),
        )
        .await
        .unwrap();

    let budget = engine
        .create_budget(dining_budget_cmd("alice", 10000))
        .await
        .unwrap();

    assert_eq!(budget.spent_minor, 3000);
}

#[tokio::test]
async fn overlapping_budgets_all_receive_the_increment() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, "alice", 20000).await;

    let roomy = engine
        .create_budget(dining_budget_cmd("alice", 10000))
        .await
        .unwrap();
    let tight = engine
        .create_budget(dining_budget_cmd("alice", 2000))
        .await
        .unwrap();

    let created = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                wallet_id,
                TransactionKind::Expense,
                Money::new(1900),
                Utc::now(),
            )
            .category(Category::Dining),
        )
        .await
        .unwrap();

    let budgets = engine.budgets("alice").await.unwrap();
    assert_eq!(budgets.len(), 2);
    for budget in &budgets {
        assert_eq!(budget.spent_minor, 1900);
    }

    // The warning comes from the budget that is closest to its limit.
    let warning = created.budget_warning.unwrap();
    assert_eq!(warning.budget_id, tight.id);
    assert_eq!(warning.percent, 95);
    assert_ne!(warning.budget_id, roomy.id);
}

#[tokio::test]
async fn budgets_are_scoped_to_their_user() {
    let (engine, _db) = engine_with_db().await;
    let alice_wallet = funded_wallet(&engine, "alice", 10000).await;
    let bob_wallet = funded_wallet(&engine, "bob", 10000).await;

    engine
        .create_budget(dining_budget_cmd("alice", 5000))
        .await
        .unwrap();

    dining_expense(&engine, "bob", bob_wallet, 2000, 0).await;
    assert_eq!(engine.budgets("alice").await.unwrap()[0].spent_minor, 0);

    dining_expense(&engine, "alice", alice_wallet, 1500, 0).await;
    assert_eq!(engine.budgets("alice").await.unwrap()[0].spent_minor, 1500);
    assert!(engine.budgets("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_budget_checks_ownership() {
    let (engine, _db) = engine_with_db().await;
    let budget = engine
        .create_budget(dining_budget_cmd("alice", 5000))
        .await
        .unwrap();

    let err = engine.delete_budget("bob", budget.id).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("budget not exists".to_string())
    );

    engine.delete_budget("alice", budget.id).await.unwrap();
    assert!(engine.budgets("alice").await.unwrap().is_empty());

    let err = engine.delete_budget("alice", budget.id).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("budget not exists".to_string())
    );
}

#[tokio::test]
async fn expenses_outside_the_window_leave_spent_alone() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, "alice", 20000).await;

    engine
        .create_budget(dining_budget_cmd("alice", 5000))
        .await
        .unwrap();

    // Occurred well before the window opened.
    dining_expense(&engine, "alice", wallet_id, 2000, 40).await;
    assert_eq!(engine.budgets("alice").await.unwrap()[0].spent_minor, 0);
}
