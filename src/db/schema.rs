pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    kind  TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
    UNIQUE(name, kind)
);

CREATE TABLE IF NOT EXISTS recurring_rules (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    kind            TEXT NOT NULL,
    amount          TEXT NOT NULL,
    category_id     INTEGER REFERENCES categories(id),
    payment_method  TEXT NOT NULL DEFAULT '',
    tags            TEXT NOT NULL DEFAULT '',
    note            TEXT NOT NULL DEFAULT '',
    every           TEXT NOT NULL DEFAULT 'monthly',
    interval        INTEGER NOT NULL DEFAULT 1,
    next_date       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    date            TEXT NOT NULL,
    amount          TEXT NOT NULL,
    kind            TEXT NOT NULL,
    category_id     INTEGER REFERENCES categories(id),
    payment_method  TEXT NOT NULL DEFAULT '',
    tags            TEXT NOT NULL DEFAULT '',
    note            TEXT NOT NULL DEFAULT '',
    recurring_id    INTEGER
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);
CREATE INDEX IF NOT EXISTS idx_transactions_recurring ON transactions(recurring_id);

CREATE TABLE IF NOT EXISTS budgets (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id  INTEGER NOT NULL UNIQUE REFERENCES categories(id),
    amount       TEXT NOT NULL,
    cycle_day    INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS settings (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
