mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::budget_status::BudgetStore;
use crate::error::ValidationError;
use crate::models::*;
use crate::recurring::RuleStore;
use crate::schedule::{format_date, parse_date, CycleWindow};

const TRANSACTION_COLUMNS: &str =
    "id, date, amount, kind, category_id, payment_method, tags, note, recurring_id";
const RULE_COLUMNS: &str =
    "id, kind, amount, category_id, payment_method, tags, note, every, interval, next_date";
/// Data tables in foreign-key order: referenced tables come first.
const DATA_TABLES: &[&str] = &["categories", "recurring_rules", "transactions", "budgets", "settings"];
const UNCATEGORIZED: &str = "Uncategorized";

/// Optional filters for [Database::get_transactions]. Date bounds are inclusive.
#[derive(Debug, Default, Clone)]
pub(crate) struct TransactionFilter {
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
    pub(crate) category_id: Option<i64>,
    pub(crate) kind: Option<TxnKind>,
    pub(crate) limit: Option<u32>,
}

/// Income and expense totals of one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlyTotals {
    pub(crate) month: String,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!("Created schema version {}", schema::CURRENT_VERSION);
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!("Migrating schema from version {from_version}");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults = [
            ("General", TxnKind::Expense),
            ("Food", TxnKind::Expense),
            ("Transport", TxnKind::Expense),
            ("Shopping", TxnKind::Expense),
            ("Salary", TxnKind::Income),
            ("Freelance", TxnKind::Income),
            ("Other", TxnKind::Income),
        ];

        let tx = self.conn.transaction()?;
        for (name, kind) in &defaults {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name, kind) VALUES (?1, ?2)",
                params![name, kind.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self, kind: Option<TxnKind>) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind FROM categories
             WHERE ?1 IS NULL OR kind = ?1
             ORDER BY kind, name",
        )?;
        let rows = stmt.query_map(params![kind.map(|k| k.as_str())], category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, kind FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()?)
    }

    /// Case-insensitive lookup. With no `kind`, the first match by kind order wins.
    pub(crate) fn find_category(&self, name: &str, kind: Option<TxnKind>) -> Result<Option<Category>> {
        let categories = self.get_categories(kind)?;
        Ok(Category::find_by_name(&categories, name.trim()).cloned())
    }

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        let name = cat.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName.into());
        }
        if self.find_category(name, Some(cat.kind))?.is_some() {
            return Err(ValidationError::DuplicateCategory(name.to_string()).into());
        }
        self.conn.execute(
            "INSERT INTO categories (name, kind) VALUES (?1, ?2)",
            params![name, cat.kind.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Returns the id of the category with this name and kind, creating it if needed.
    pub(crate) fn ensure_category(&self, name: &str, kind: TxnKind) -> Result<i64> {
        if let Some(id) = self.find_category(name, Some(kind))?.and_then(|c| c.id) {
            return Ok(id);
        }
        self.insert_category(&Category::new(name.to_string(), kind))
    }

    pub(crate) fn rename_category(&self, id: i64, new_name: &str) -> Result<bool> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ValidationError::EmptyCategoryName.into());
        }
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![new_name, id],
        )?;
        Ok(changed > 0)
    }

    /// Deletes a category. Transactions and rules keep existing without a
    /// category; the category's budget is removed.
    pub(crate) fn delete_category(&mut self, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE transactions SET category_id = NULL WHERE category_id = ?1",
            params![id],
        )?;
        tx.execute(
            "UPDATE recurring_rules SET category_id = NULL WHERE category_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM budgets WHERE category_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        insert_transaction_row(&self.conn, txn)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
                params![id],
                transaction_from_row,
            )
            .optional()?)
    }

    /// Overwrites the editable fields of transaction `id`. The link to the
    /// recurring rule that generated it is left alone.
    pub(crate) fn update_transaction(&self, id: i64, txn: &Transaction) -> Result<bool> {
        if txn.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(txn.amount).into());
        }
        let changed = self.conn.execute(
            "UPDATE transactions
             SET date = ?1, amount = ?2, kind = ?3, category_id = ?4,
                 payment_method = ?5, tags = ?6, note = ?7
             WHERE id = ?8",
            params![
                format_date(txn.date),
                txn.amount.to_string(),
                txn.kind.as_str(),
                txn.category_id,
                txn.payment_method,
                txn.tags,
                txn.note,
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn get_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(from) = filter.from {
            sql.push_str(&format!(" AND t.date >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(format_date(from)));
        }
        if let Some(to) = filter.to {
            sql.push_str(&format!(" AND t.date <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(format_date(to)));
        }
        if let Some(cid) = filter.category_id {
            sql.push_str(&format!(" AND t.category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        if let Some(kind) = filter.kind {
            sql.push_str(&format!(" AND t.kind = ?{}", param_values.len() + 1));
            param_values.push(Box::new(kind.as_str()));
        }

        sql.push_str(" ORDER BY t.date DESC, t.id DESC");

        if let Some(l) = filter.limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// All-time (income, expense, balance).
    pub(crate) fn get_totals(&self) -> Result<(Decimal, Decimal, Decimal)> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, amount FROM transactions")?;
        let rows = stmt.query_map([], |row| {
            let kind = kind_from_column(row, 0)?;
            Ok((kind, decimal_from_column(row, 1)?))
        })?;

        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for row in rows {
            match row? {
                (TxnKind::Income, amount) => income = add_amount(income, amount)?,
                (TxnKind::Expense, amount) => expense = add_amount(expense, amount)?,
            }
        }
        let balance = income
            .checked_sub(expense)
            .context("Balance overflowed")?;
        Ok((income, expense, balance))
    }

    // ── Reports ───────────────────────────────────────────────

    /// All-time expense totals per category, largest first.
    pub(crate) fn get_expense_by_category(&self) -> Result<Vec<(String, Decimal)>> {
        let categories = self.get_categories(None)?;
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for txn in self.get_transactions(&TransactionFilter::default())? {
            if !txn.is_expense() {
                continue;
            }
            let name = txn
                .category_id
                .and_then(|id| Category::find_by_id(&categories, id))
                .map_or(UNCATEGORIZED, |c| c.name.as_str());
            let total = totals.entry(name.to_string()).or_default();
            *total = add_amount(*total, txn.amount)?;
        }

        let mut rows: Vec<(String, Decimal)> = totals.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(rows)
    }

    /// Income and expense per calendar month, oldest month first.
    pub(crate) fn get_monthly_summary(&self) -> Result<Vec<MonthlyTotals>> {
        let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for txn in self.get_transactions(&TransactionFilter::default())? {
            let (income, expense) = months
                .entry(txn.date.format("%Y-%m").to_string())
                .or_default();
            if txn.is_income() {
                *income = add_amount(*income, txn.amount)?;
            } else {
                *expense = add_amount(*expense, txn.amount)?;
            }
        }
        Ok(months
            .into_iter()
            .map(|(month, (income, expense))| MonthlyTotals {
                month,
                income,
                expense,
            })
            .collect())
    }

    /// Running balance at the end of every day that has transactions,
    /// oldest first.
    pub(crate) fn get_balance_series(&self) -> Result<Vec<(NaiveDate, Decimal)>> {
        let mut txns = self.get_transactions(&TransactionFilter::default())?;
        // Listed newest first; replay oldest first.
        txns.reverse();

        let mut balance = Decimal::ZERO;
        let mut points: Vec<(NaiveDate, Decimal)> = Vec::new();
        for txn in &txns {
            balance = add_amount(balance, txn.signed_amount())?;
            match points.last_mut() {
                Some((date, last)) if *date == txn.date => *last = balance,
                _ => points.push((txn.date, balance)),
            }
        }
        Ok(points)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn create_budget(&self, budget: &Budget) -> Result<i64> {
        self.validate_budget(budget, None)?;
        self.conn.execute(
            "INSERT INTO budgets (category_id, amount, cycle_day) VALUES (?1, ?2, ?3)",
            params![
                budget.category_id,
                budget.amount.to_string(),
                budget.cycle_day,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn update_budget(&self, id: i64, budget: &Budget) -> Result<bool> {
        self.validate_budget(budget, Some(id))?;
        let changed = self.conn.execute(
            "UPDATE budgets SET category_id = ?1, amount = ?2, cycle_day = ?3 WHERE id = ?4",
            params![
                budget.category_id,
                budget.amount.to_string(),
                budget.cycle_day,
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    fn validate_budget(&self, budget: &Budget, existing_id: Option<i64>) -> Result<()> {
        if budget.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(budget.amount).into());
        }
        if self.get_category_by_id(budget.category_id)?.is_none() {
            return Err(ValidationError::UnknownCategory(budget.category_id.to_string()).into());
        }
        let taken: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM budgets WHERE category_id = ?1",
                params![budget.category_id],
                |row| row.get(0),
            )
            .optional()?;
        match taken {
            Some(other) if Some(other) != existing_id => {
                Err(ValidationError::DuplicateBudget(budget.category_id).into())
            }
            _ => Ok(()),
        }
    }

    /// Budgets paired with their category, ordered by category kind and name.
    pub(crate) fn get_budgets(&self) -> Result<Vec<(Budget, Category)>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.id, b.category_id, b.amount, b.cycle_day, c.id, c.name, c.kind
             FROM budgets b JOIN categories c ON b.category_id = c.id
             ORDER BY c.kind, c.name",
        )?;
        let rows = stmt.query_map([], |row| {
            let budget = Budget {
                id: Some(row.get(0)?),
                category_id: row.get(1)?,
                amount: decimal_from_column(row, 2)?,
                cycle_day: crate::schedule::clamp_cycle_day(row.get(3)?),
            };
            let category = Category {
                id: Some(row.get(4)?),
                name: row.get(5)?,
                kind: kind_from_column(row, 6)?,
            };
            Ok((budget, category))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn delete_budget(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Sum of expense amounts for a category with dates inside `window`.
    pub(crate) fn get_expense_total(&self, category_id: i64, window: &CycleWindow) -> Result<Decimal> {
        let mut stmt = self.conn.prepare(
            "SELECT amount FROM transactions
             WHERE kind = 'expense' AND category_id = ?1 AND date >= ?2 AND date < ?3",
        )?;
        let rows = stmt.query_map(
            params![category_id, format_date(window.start), format_date(window.end)],
            |row| decimal_from_column(row, 0),
        )?;
        let mut total = Decimal::ZERO;
        for amount in rows {
            total = add_amount(total, amount?)
                .with_context(|| format!("Spending in category {category_id} for {window}"))?;
        }
        Ok(total)
    }

    // ── Recurring rules ───────────────────────────────────────

    pub(crate) fn insert_recurring_rule(&self, rule: &RecurringRule) -> Result<i64> {
        if rule.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(rule.amount).into());
        }
        if rule.interval < 1 {
            return Err(ValidationError::InvalidInterval(i64::from(rule.interval)).into());
        }
        let next_date = match &rule.next_date {
            DueDate::On(date) => format_date(*date),
            DueDate::Unreadable(raw) => {
                anyhow::bail!("Cannot create a rule with an unreadable due date: {raw}")
            }
        };
        self.conn.execute(
            "INSERT INTO recurring_rules
                (kind, amount, category_id, payment_method, tags, note, every, interval, next_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                rule.kind.as_str(),
                rule.amount.to_string(),
                rule.category_id,
                rule.payment_method,
                rule.tags,
                rule.note,
                rule.every.as_str(),
                rule.interval,
                next_date,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_recurring_rules(&self) -> Result<Vec<RecurringRule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RULE_COLUMNS} FROM recurring_rules ORDER BY id"
        ))?;
        let rows = stmt.query_map([], |row| {
            let interval: i64 = row.get(8)?;
            let next_date: String = row.get(9)?;
            Ok(RecurringRule {
                id: Some(row.get(0)?),
                kind: kind_from_column(row, 1)?,
                amount: decimal_from_column(row, 2)?,
                category_id: row.get(3)?,
                payment_method: row.get(4)?,
                tags: row.get(5)?,
                note: row.get(6)?,
                every: Frequency::parse(&row.get::<_, String>(7)?),
                interval: u32::try_from(interval).unwrap_or(1).max(1),
                next_date: DueDate::parse(&next_date),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn delete_recurring_rule(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM recurring_rules WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Inserts a rule's generated transactions and moves its due date in a
    /// single SQLite transaction. Nothing is written if any step fails.
    pub(crate) fn record_occurrences(
        &mut self,
        rule_id: i64,
        occurrences: &[Transaction],
        next_date: NaiveDate,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        for txn in occurrences {
            insert_transaction_row(&tx, txn)?;
        }
        let updated = tx.execute(
            "UPDATE recurring_rules SET next_date = ?1 WHERE id = ?2",
            params![format_date(next_date), rule_id],
        )?;
        if updated == 0 {
            anyhow::bail!("Recurring rule {rule_id} no longer exists");
        }
        tx.commit()?;
        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub(crate) fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Maintenance ───────────────────────────────────────────

    /// Writes a consistent snapshot of the database to `dest`, which must
    /// not exist yet.
    pub(crate) fn backup_to(&self, dest: &Path) -> Result<()> {
        if dest.exists() {
            anyhow::bail!("Backup target already exists: {}", dest.display());
        }
        self.conn
            .execute("VACUUM INTO ?1", params![dest.to_string_lossy().into_owned()])
            .with_context(|| format!("Failed to back up database to {}", dest.display()))?;
        tracing::info!("Backed up database to {}", dest.display());
        Ok(())
    }

    /// Replaces every category, transaction, budget, rule and setting with
    /// the contents of a backup made by [Database::backup_to]. Nothing
    /// changes if the backup cannot be read.
    pub(crate) fn restore_from(&mut self, src: &Path) -> Result<()> {
        if !src.is_file() {
            anyhow::bail!("Backup not found: {}", src.display());
        }
        self.conn
            .execute(
                "ATTACH DATABASE ?1 AS snapshot",
                params![src.to_string_lossy().into_owned()],
            )
            .with_context(|| format!("Failed to open backup {}", src.display()))?;

        let copied = self.copy_from_backup();
        let detached = self.conn.execute_batch("DETACH DATABASE snapshot");
        copied.with_context(|| format!("Failed to restore from {}", src.display()))?;
        detached?;

        tracing::info!("Restored database from {}", src.display());
        Ok(())
    }

    fn copy_from_backup(&mut self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("SELECT version FROM snapshot.schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Not a spent database")?;
        if version != schema::CURRENT_VERSION {
            anyhow::bail!(
                "Backup has schema version {version}, expected {}",
                schema::CURRENT_VERSION
            );
        }

        let tx = self.conn.transaction()?;
        for table in DATA_TABLES.iter().rev() {
            tx.execute(&format!("DELETE FROM main.{table}"), [])?;
        }
        for table in DATA_TABLES {
            tx.execute(
                &format!("INSERT INTO main.{table} SELECT * FROM snapshot.{table}"),
                [],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Deletes all transactions, budgets and recurring rules. Categories and
    /// settings are kept.
    pub(crate) fn wipe_all_data(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transactions", [])?;
        tx.execute("DELETE FROM budgets", [])?;
        tx.execute("DELETE FROM recurring_rules", [])?;
        tx.commit()?;
        Ok(())
    }
}

impl RuleStore for Database {
    fn recurring_rules(&self) -> Result<Vec<RecurringRule>> {
        self.get_recurring_rules()
    }

    fn commit_occurrences(
        &mut self,
        rule_id: i64,
        occurrences: &[Transaction],
        next_date: NaiveDate,
    ) -> Result<()> {
        self.record_occurrences(rule_id, occurrences, next_date)
    }
}

impl BudgetStore for Database {
    fn budgets_with_categories(&self) -> Result<Vec<(Budget, Category)>> {
        self.get_budgets()
    }

    fn expense_total(&self, category_id: i64, window: &CycleWindow) -> Result<Decimal> {
        self.get_expense_total(category_id, window)
    }
}

fn insert_transaction_row(conn: &Connection, txn: &Transaction) -> Result<i64> {
    if txn.amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount(txn.amount).into());
    }
    conn.execute(
        "INSERT INTO transactions (date, amount, kind, category_id, payment_method, tags, note, recurring_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            format_date(txn.date),
            txn.amount.to_string(),
            txn.kind.as_str(),
            txn.category_id,
            txn.payment_method,
            txn.tags,
            txn.note,
            txn.recurring_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        kind: kind_from_column(row, 2)?,
    })
}

fn transaction_from_row(row: &Row) -> rusqlite::Result<Transaction> {
    let date: String = row.get(1)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        date: parse_date(&date)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
        amount: decimal_from_column(row, 2)?,
        kind: kind_from_column(row, 3)?,
        category_id: row.get(4)?,
        payment_method: row.get(5)?,
        tags: row.get(6)?,
        note: row.get(7)?,
        recurring_id: row.get(8)?,
    })
}

fn kind_from_column(row: &Row, idx: usize) -> rusqlite::Result<TxnKind> {
    let raw: String = row.get(idx)?;
    TxnKind::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(ValidationError::UnknownKind(raw)),
        )
    })
}

/// Unparseable stored amounts read as zero so one bad row cannot hide the rest.
fn decimal_from_column(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Ok(Decimal::from_str(raw.trim()).unwrap_or_else(|e| {
        tracing::warn!(stored = %raw, column = idx, "Unreadable amount ({e}); reading it as 0");
        Decimal::ZERO
    }))
}

fn add_amount(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total
        .checked_add(amount)
        .with_context(|| format!("Sum of amounts overflowed adding {amount} to {total}"))
}

#[cfg(test)]
mod tests;
