#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn category_id(db: &Database, name: &str) -> i64 {
    db.find_category(name, None).unwrap().unwrap().id.unwrap()
}

fn expense(on: &str, amount: Decimal, category_id: Option<i64>) -> Transaction {
    let mut txn = Transaction::new(date(on), amount, TxnKind::Expense);
    txn.category_id = category_id;
    txn
}

// ── Default data ──────────────────────────────────────────────

#[test]
fn test_default_categories_seeded() {
    let db = Database::open_in_memory().unwrap();
    let cats = db.get_categories(None).unwrap();
    assert_eq!(cats.len(), 7);
    assert!(cats.iter().any(|c| c.name == "Food" && c.kind == TxnKind::Expense));
    assert!(cats.iter().any(|c| c.name == "Salary" && c.kind == TxnKind::Income));
}

#[test]
fn test_categories_ordered_by_kind_then_name() {
    let db = Database::open_in_memory().unwrap();
    let names: Vec<String> = db
        .get_categories(None)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(
        names,
        vec!["Food", "General", "Shopping", "Transport", "Freelance", "Other", "Salary"]
    );

    let income = db.get_categories(Some(TxnKind::Income)).unwrap();
    assert_eq!(income.len(), 3);
    assert!(income.iter().all(|c| c.kind == TxnKind::Income));
}

#[test]
fn test_reopen_keeps_data_and_does_not_reseed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spent.db");
    {
        let mut db = Database::open(&path).unwrap();
        let general = category_id(&db, "General");
        db.delete_category(general).unwrap();
        db.insert_transaction(&expense("2024-01-01", dec!(3), None))
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_categories(None).unwrap().len(), 6);
    assert_eq!(db.get_transaction_count().unwrap(), 1);
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_insert_and_validation() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_category(&Category::new(" Rent ".into(), TxnKind::Expense))
        .unwrap();
    let cat = db.get_category_by_id(id).unwrap().unwrap();
    assert_eq!(cat.name, "Rent");

    let err = db
        .insert_category(&Category::new("rent".into(), TxnKind::Expense))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::DuplicateCategory(_))
    ));

    // Same name is allowed for the other kind.
    db.insert_category(&Category::new("Rent".into(), TxnKind::Income))
        .unwrap();

    let err = db
        .insert_category(&Category::new("   ".into(), TxnKind::Income))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::EmptyCategoryName)
    );
}

#[test]
fn test_ensure_category_reuses_existing() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    assert_eq!(db.ensure_category("food", TxnKind::Expense).unwrap(), food);

    let before = db.get_categories(None).unwrap().len();
    let gifts = db.ensure_category("Gifts", TxnKind::Income).unwrap();
    assert_eq!(db.get_categories(None).unwrap().len(), before + 1);
    assert_eq!(db.ensure_category("Gifts", TxnKind::Income).unwrap(), gifts);
}

#[test]
fn test_rename_category() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    assert!(db.rename_category(food, "Groceries").unwrap());
    assert_eq!(db.get_category_by_id(food).unwrap().unwrap().name, "Groceries");
    assert!(!db.rename_category(9999, "Nothing").unwrap());
    assert!(db.rename_category(food, "").is_err());
}

#[test]
fn test_delete_category_nulls_references() {
    let mut db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let txn_id = db
        .insert_transaction(&expense("2024-01-05", dec!(20), Some(food)))
        .unwrap();
    db.create_budget(&Budget::new(food, dec!(200), 1)).unwrap();
    let mut rule = RecurringRule::new(TxnKind::Expense, dec!(5), Frequency::Weekly, date("2024-01-01"));
    rule.category_id = Some(food);
    db.insert_recurring_rule(&rule).unwrap();

    assert!(db.delete_category(food).unwrap());

    let txn = db.get_transaction(txn_id).unwrap().unwrap();
    assert!(txn.category_id.is_none());
    assert_eq!(txn.amount, dec!(20));
    assert!(db.get_budgets().unwrap().is_empty());
    assert!(db.get_recurring_rules().unwrap()[0].category_id.is_none());
    assert!(db.get_category_by_id(food).unwrap().is_none());
    assert!(!db.delete_category(food).unwrap());
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_transaction_insert_and_get() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let mut txn = expense("2024-01-15", dec!(42.99), Some(food));
    txn.payment_method = "Card".into();
    txn.tags = "groceries,weekly".into();
    txn.note = "Market".into();

    let id = db.insert_transaction(&txn).unwrap();
    let fetched = db.get_transaction(id).unwrap().unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.date, date("2024-01-15"));
    assert_eq!(fetched.amount, dec!(42.99));
    assert_eq!(fetched.kind, TxnKind::Expense);
    assert_eq!(fetched.category_id, Some(food));
    assert_eq!(fetched.payment_method, "Card");
    assert_eq!(fetched.tags, "groceries,weekly");
    assert_eq!(fetched.note, "Market");
    assert!(fetched.recurring_id.is_none());

    assert!(db.get_transaction(9999).unwrap().is_none());
}

#[test]
fn test_negative_amount_rejected() {
    let db = Database::open_in_memory().unwrap();
    let err = db
        .insert_transaction(&expense("2024-01-15", dec!(-1), None))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::NegativeAmount(dec!(-1)))
    );
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_transaction_filters() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let salary = category_id(&db, "Salary");
    db.insert_transaction(&expense("2024-01-10", dec!(5.25), Some(food)))
        .unwrap();
    db.insert_transaction(&expense("2024-01-20", dec!(7), Some(food)))
        .unwrap();
    db.insert_transaction(&expense("2024-02-05", dec!(87.30), None))
        .unwrap();
    let mut pay = Transaction::new(date("2024-01-31"), dec!(3000), TxnKind::Income);
    pay.category_id = Some(salary);
    db.insert_transaction(&pay).unwrap();

    let all = db.get_transactions(&TransactionFilter::default()).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].date, date("2024-02-05"));

    let january = db
        .get_transactions(&TransactionFilter {
            from: Some(date("2024-01-01")),
            to: Some(date("2024-01-31")),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(january.len(), 3);

    let food_only = db
        .get_transactions(&TransactionFilter {
            category_id: Some(food),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(food_only.len(), 2);

    let income = db
        .get_transactions(&TransactionFilter {
            kind: Some(TxnKind::Income),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].amount, dec!(3000));

    let limited = db
        .get_transactions(&TransactionFilter {
            limit: Some(1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn test_delete_transaction() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_transaction(&expense("2024-01-10", dec!(1), None))
        .unwrap();
    assert!(db.delete_transaction(id).unwrap());
    assert!(!db.delete_transaction(id).unwrap());
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_totals() {
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&expense("2024-01-10", dec!(0.10), None))
        .unwrap();
    db.insert_transaction(&expense("2024-01-11", dec!(0.20), None))
        .unwrap();
    db.insert_transaction(&Transaction::new(date("2024-01-12"), dec!(100), TxnKind::Income))
        .unwrap();

    let (income, expense_total, balance) = db.get_totals().unwrap();
    assert_eq!(income, dec!(100));
    assert_eq!(expense_total, dec!(0.30));
    assert_eq!(balance, dec!(99.70));
}

#[test]
fn test_update_transaction_keeps_rule_link() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let mut txn = expense("2024-01-10", dec!(5), Some(food));
    txn.recurring_id = Some(42);
    let id = db.insert_transaction(&txn).unwrap();

    let mut edited = db.get_transaction(id).unwrap().unwrap();
    edited.amount = dec!(6.25);
    edited.kind = TxnKind::Income;
    edited.category_id = None;
    edited.note = "refund".into();
    edited.recurring_id = None;
    assert!(db.update_transaction(id, &edited).unwrap());

    let stored = db.get_transaction(id).unwrap().unwrap();
    assert_eq!(stored.amount, dec!(6.25));
    assert_eq!(stored.kind, TxnKind::Income);
    assert!(stored.category_id.is_none());
    assert_eq!(stored.note, "refund");
    assert_eq!(stored.recurring_id, Some(42));

    assert!(!db.update_transaction(9999, &edited).unwrap());
    edited.amount = dec!(-1);
    assert!(db.update_transaction(id, &edited).is_err());
}

#[test]
fn test_totals_overflow_is_an_error() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    db.insert_transaction(&expense("2025-03-01", Decimal::MAX, Some(food)))
        .unwrap();
    db.insert_transaction(&expense("2025-03-02", Decimal::MAX, Some(food)))
        .unwrap();

    let window = crate::schedule::cycle_window(1, date("2025-03-10"));
    assert!(db.get_expense_total(food, &window).is_err());
    assert!(db.get_totals().is_err());
    assert!(crate::budget_status::budgets_with_status(&db, date("2025-03-10")).is_ok());

    db.create_budget(&Budget::new(food, dec!(10), 1)).unwrap();
    assert!(crate::budget_status::budgets_with_status(&db, date("2025-03-10")).is_err());
}

#[test]
fn test_tiny_budget_with_large_spend_is_an_error() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    db.create_budget(&Budget::new(food, dec!(0.0000001), 1)).unwrap();
    db.insert_transaction(&expense("2025-03-01", dec!(10000000000000000000000), Some(food)))
        .unwrap();
    assert!(crate::budget_status::any_budget_overspent(&db, date("2025-03-10")).is_err());
}

#[test]
fn test_unreadable_amount_reads_as_zero() {
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&expense("2024-01-10", dec!(4), None))
        .unwrap();
    db.conn
        .execute(
            "INSERT INTO transactions (date, amount, kind) VALUES ('2024-01-11', 'lots', 'expense')",
            [],
        )
        .unwrap();

    let txns = db.get_transactions(&TransactionFilter::default()).unwrap();
    assert_eq!(txns[0].amount, Decimal::ZERO);
    assert_eq!(db.get_totals().unwrap().1, dec!(4));
}

// ── Reports ───────────────────────────────────────────────────

fn report_fixture() -> Database {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let transport = category_id(&db, "Transport");
    db.insert_transaction(&expense("2024-01-05", dec!(10), Some(food)))
        .unwrap();
    db.insert_transaction(&expense("2024-01-05", dec!(2.50), None))
        .unwrap();
    db.insert_transaction(&expense("2024-02-10", dec!(30), Some(transport)))
        .unwrap();
    db.insert_transaction(&expense("2024-02-11", dec!(5), Some(food)))
        .unwrap();
    db.insert_transaction(&Transaction::new(date("2024-01-01"), dec!(100), TxnKind::Income))
        .unwrap();
    db
}

#[test]
fn test_expense_by_category() {
    let db = report_fixture();
    assert_eq!(
        db.get_expense_by_category().unwrap(),
        vec![
            ("Transport".to_string(), dec!(30)),
            ("Food".to_string(), dec!(15)),
            ("Uncategorized".to_string(), dec!(2.50)),
        ]
    );
}

#[test]
fn test_monthly_summary() {
    let db = report_fixture();
    assert_eq!(
        db.get_monthly_summary().unwrap(),
        vec![
            MonthlyTotals {
                month: "2024-01".into(),
                income: dec!(100),
                expense: dec!(12.50),
            },
            MonthlyTotals {
                month: "2024-02".into(),
                income: Decimal::ZERO,
                expense: dec!(35),
            },
        ]
    );
}

#[test]
fn test_balance_series_one_point_per_day() {
    let db = report_fixture();
    assert_eq!(
        db.get_balance_series().unwrap(),
        vec![
            (date("2024-01-01"), dec!(100)),
            (date("2024-01-05"), dec!(87.50)),
            (date("2024-02-10"), dec!(57.50)),
            (date("2024-02-11"), dec!(52.50)),
        ]
    );
}

#[test]
fn test_reports_empty_database() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_expense_by_category().unwrap().is_empty());
    assert!(db.get_monthly_summary().unwrap().is_empty());
    assert!(db.get_balance_series().unwrap().is_empty());
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_crud() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    let shopping = category_id(&db, "Shopping");

    let id = db.create_budget(&Budget::new(food, dec!(500), 15)).unwrap();
    let budgets = db.get_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    let (budget, category) = &budgets[0];
    assert_eq!(budget.id, Some(id));
    assert_eq!(budget.amount, dec!(500));
    assert_eq!(budget.cycle_day, 15);
    assert_eq!(category.name, "Food");

    assert!(db.update_budget(id, &Budget::new(shopping, dec!(750), 3)).unwrap());
    let (budget, category) = db.get_budgets().unwrap().remove(0);
    assert_eq!(budget.category_id, shopping);
    assert_eq!(budget.amount, dec!(750));
    assert_eq!(budget.cycle_day, 3);
    assert_eq!(category.name, "Shopping");

    assert!(!db.update_budget(9999, &Budget::new(food, dec!(1), 1)).unwrap());
    assert!(db.delete_budget(id).unwrap());
    assert!(!db.delete_budget(id).unwrap());
}

#[test]
fn test_budget_validation() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");

    let err = db.create_budget(&Budget::new(food, dec!(0), 1)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::NonPositiveAmount(dec!(0)))
    );
    let err = db.create_budget(&Budget::new(food, dec!(-5), 1)).unwrap_err();
    assert!(err.downcast_ref::<ValidationError>().is_some());

    let err = db.create_budget(&Budget::new(9999, dec!(5), 1)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::UnknownCategory("9999".into()))
    );

    let id = db.create_budget(&Budget::new(food, dec!(5), 1)).unwrap();
    let err = db.create_budget(&Budget::new(food, dec!(10), 1)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::DuplicateBudget(food))
    );

    // Updating a budget in place is not a duplicate of itself.
    assert!(db.update_budget(id, &Budget::new(food, dec!(10), 28)).unwrap());
    assert!(db.update_budget(id, &Budget::new(food, dec!(0), 28)).is_err());
}

#[test]
fn test_expense_total_is_half_open() {
    let db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    for (on, amount) in [
        ("2025-02-14", dec!(1)),
        ("2025-02-15", dec!(2)),
        ("2025-03-14", dec!(4)),
        ("2025-03-15", dec!(8)),
    ] {
        db.insert_transaction(&expense(on, amount, Some(food))).unwrap();
    }
    let window = crate::schedule::cycle_window(15, date("2025-03-10"));
    assert_eq!(db.get_expense_total(food, &window).unwrap(), dec!(6));
    assert_eq!(
        db.get_expense_total(category_id(&db, "Transport"), &window).unwrap(),
        Decimal::ZERO
    );
}

// ── Recurring rules ───────────────────────────────────────────

#[test]
fn test_recurring_rule_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let salary = category_id(&db, "Salary");
    let mut rule = RecurringRule::new(TxnKind::Income, dec!(3000), Frequency::Monthly, date("2024-01-25"));
    rule.category_id = Some(salary);
    rule.interval = 2;
    rule.payment_method = "Bank".into();
    rule.note = "Payroll".into();

    let id = db.insert_recurring_rule(&rule).unwrap();
    let stored = db.get_recurring_rules().unwrap().remove(0);
    rule.id = Some(id);
    assert_eq!(stored, rule);

    assert!(db.delete_recurring_rule(id).unwrap());
    assert!(db.get_recurring_rules().unwrap().is_empty());
}

#[test]
fn test_recurring_rule_validation() {
    let db = Database::open_in_memory().unwrap();
    let mut rule = RecurringRule::new(TxnKind::Expense, dec!(-3), Frequency::Weekly, date("2024-01-01"));
    assert!(db.insert_recurring_rule(&rule).is_err());

    rule.amount = dec!(3);
    rule.interval = 0;
    assert_eq!(
        db.insert_recurring_rule(&rule)
            .unwrap_err()
            .downcast_ref::<ValidationError>(),
        Some(&ValidationError::InvalidInterval(0))
    );

    rule.interval = 1;
    rule.next_date = DueDate::Unreadable("whenever".into());
    assert!(db.insert_recurring_rule(&rule).is_err());
    assert!(db.get_recurring_rules().unwrap().is_empty());
}

#[test]
fn test_stored_rule_values_read_leniently() {
    let db = Database::open_in_memory().unwrap();
    db.conn
        .execute(
            "INSERT INTO recurring_rules (kind, amount, every, interval, next_date)
             VALUES ('expense', '4.50', 'daily', 0, 'not-a-date')",
            [],
        )
        .unwrap();

    let rule = db.get_recurring_rules().unwrap().remove(0);
    assert_eq!(rule.every, Frequency::Monthly);
    assert_eq!(rule.interval, 1);
    assert_eq!(rule.next_date, DueDate::Unreadable("not-a-date".into()));
    assert_eq!(rule.amount, dec!(4.50));
}

#[test]
fn test_record_occurrences_is_atomic() {
    let mut db = Database::open_in_memory().unwrap();
    let rule = RecurringRule::new(TxnKind::Expense, dec!(5), Frequency::Weekly, date("2024-01-01"));
    let id = db.insert_recurring_rule(&rule).unwrap();
    let mut with_id = rule.clone();
    with_id.id = Some(id);

    let occurrences = vec![with_id.occurrence(date("2024-01-01")), with_id.occurrence(date("2024-01-08"))];
    db.record_occurrences(id, &occurrences, date("2024-01-15"))
        .unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 2);
    assert_eq!(
        db.get_recurring_rules().unwrap()[0].next_date,
        DueDate::On(date("2024-01-15"))
    );

    // A rule that no longer exists rolls back its occurrences.
    let err = db
        .record_occurrences(9999, &occurrences, date("2024-01-15"))
        .unwrap_err();
    assert!(err.to_string().contains("9999"));
    assert_eq!(db.get_transaction_count().unwrap(), 2);

    // So does an invalid occurrence midway through.
    let mut bad = occurrences.clone();
    bad[1].amount = dec!(-1);
    assert!(db.record_occurrences(id, &bad, date("2024-02-01")).is_err());
    assert_eq!(db.get_transaction_count().unwrap(), 2);
    assert_eq!(
        db.get_recurring_rules().unwrap()[0].next_date,
        DueDate::On(date("2024-01-15"))
    );
}

// ── Settings & maintenance ────────────────────────────────────

#[test]
fn test_settings() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_setting("currency").unwrap().is_none());
    db.set_setting("currency", "EUR").unwrap();
    db.set_setting("currency", "USD").unwrap();
    assert_eq!(db.get_setting("currency").unwrap().as_deref(), Some("USD"));
}

#[test]
fn test_wipe_keeps_categories_and_settings() {
    let mut db = Database::open_in_memory().unwrap();
    let food = category_id(&db, "Food");
    db.insert_transaction(&expense("2024-01-10", dec!(1), Some(food)))
        .unwrap();
    db.create_budget(&Budget::new(food, dec!(10), 1)).unwrap();
    db.insert_recurring_rule(&RecurringRule::new(
        TxnKind::Expense,
        dec!(1),
        Frequency::Monthly,
        date("2024-01-01"),
    ))
    .unwrap();
    db.set_setting("theme", "dark").unwrap();

    db.wipe_all_data().unwrap();

    assert_eq!(db.get_transaction_count().unwrap(), 0);
    assert!(db.get_budgets().unwrap().is_empty());
    assert!(db.get_recurring_rules().unwrap().is_empty());
    assert_eq!(db.get_categories(None).unwrap().len(), 7);
    assert_eq!(db.get_setting("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_backup_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let backup = dir.path().join("backup.db");
    let mut db = Database::open(&dir.path().join("spent.db")).unwrap();
    let food = category_id(&db, "Food");
    db.insert_transaction(&expense("2024-01-10", dec!(3), Some(food)))
        .unwrap();
    db.create_budget(&Budget::new(food, dec!(50), 5)).unwrap();
    db.set_setting("currency", "EUR").unwrap();

    db.backup_to(&backup).unwrap();
    assert!(db.backup_to(&backup).is_err());

    db.wipe_all_data().unwrap();
    db.delete_category(food).unwrap();
    db.set_setting("currency", "USD").unwrap();

    db.restore_from(&backup).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 1);
    assert_eq!(db.get_categories(None).unwrap().len(), 7);
    let (budget, category) = db.get_budgets().unwrap().remove(0);
    assert_eq!(budget.cycle_day, 5);
    assert_eq!(category.id, Some(food));
    assert_eq!(db.get_setting("currency").unwrap().as_deref(), Some("EUR"));
}

#[test]
fn test_restore_rejects_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&dir.path().join("spent.db")).unwrap();
    db.insert_transaction(&expense("2024-01-10", dec!(3), None))
        .unwrap();

    assert!(db.restore_from(&dir.path().join("missing.db")).is_err());

    let other = dir.path().join("other.db");
    rusqlite::Connection::open(&other)
        .unwrap()
        .execute_batch("CREATE TABLE notes (body TEXT);")
        .unwrap();
    let err = db.restore_from(&other).unwrap_err();
    assert!(format!("{err:#}").contains("Not a spent database"));

    assert_eq!(db.get_transaction_count().unwrap(), 1);
    // The backup is detached again, so a later restore can attach it.
    let backup = dir.path().join("backup.db");
    db.backup_to(&backup).unwrap();
    db.restore_from(&backup).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 1);
}
