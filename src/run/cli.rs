use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::budget_status::{budgets_with_status, BudgetStatus};
use crate::config::expand_home;
use crate::db::{Database, TransactionFilter};
use crate::error::ValidationError;
use crate::format::{format_amount, progress_bar, truncate};
use crate::models::{Budget, Category, Frequency, RecurringRule, Transaction, TxnKind};
use crate::recurring::apply_due_rules;
use crate::schedule::{cycle_window, format_date, parse_date};

/// Options that take a value; everything else starting with `--` is a switch.
const VALUE_FLAGS: &[&str] = &[
    "--date",
    "--amount",
    "--day",
    "--interval",
    "--next",
    "--payment",
    "--tags",
    "--note",
    "--from",
    "--to",
    "--category",
    "--type",
    "--limit",
];

pub(crate) fn as_cli(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_status(&[], db, today);
    };
    let rest = &args[2..];
    match command.as_str() {
        "status" => cli_status(rest, db, today),
        "catch-up" => cli_catch_up(rest, db, today),
        "budgets" | "b" => cli_budgets(rest, db, today),
        "budget" => cli_budget(rest, db),
        "rules" => cli_rules(db),
        "rule" => cli_rule(rest, db, today),
        "add" => cli_add(rest, db, today),
        "list" | "ls" => cli_list(rest, db),
        "show" => cli_show(rest, db, today),
        "txn" => cli_txn(rest, db),
        "rm" => cli_rm(rest, db),
        "report" | "r" => cli_report(rest, db),
        "categories" => cli_categories(db),
        "category" => cli_category(rest, db),
        "summary" | "s" => cli_summary(db),
        "config" => cli_config(rest, db),
        "backup" => cli_backup(rest, db),
        "restore" => cli_restore(rest, db),
        "wipe" => cli_wipe(rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spent {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Spent - local personal finance tracker");
    println!();
    println!("Usage: spent [--db <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none), status [--date D]     Budget status and totals");
    println!("  catch-up [--date D]           Add due recurring transactions up to D (default: today)");
    println!("  budgets [--date D]            Budget status for the cycle containing D");
    println!("  budget add <category> <amount> [--day N]");
    println!("  budget set <id> <category> <amount> [--day N]");
    println!("  budget rm <id>");
    println!("  rules                         List recurring rules");
    println!("  rule add <income|expense> <amount> <category> <weekly|monthly|yearly>");
    println!("           [--interval N] [--next D] [--payment P] [--tags T] [--note N]");
    println!("  rule rm <id>");
    println!("  add <income|expense> <amount> <category> [--date D] [--payment P] [--tags T] [--note N]");
    println!("  list [--from D] [--to D] [--category C] [--type T] [--limit N]");
    println!("  show <id>                     Transaction details");
    println!("  txn set <id> [--date D] [--amount A] [--type T] [--category C]");
    println!("          [--payment P] [--tags T] [--note N]");
    println!("  rm <id>                       Delete a transaction");
    println!("  report [category|monthly|balance]");
    println!("  categories                    List categories");
    println!("  category add <name> <income|expense>");
    println!("  category rename <id> <name>");
    println!("  category rm <id>");
    println!("  summary                       All-time income, expenses and balance");
    println!("  config get <key> | config set <key> <value>");
    println!("  backup <path>                 Write a snapshot of the database to a new file");
    println!("  restore <path> --yes          Replace all data with a backup");
    println!("  wipe --yes                    Delete all transactions, budgets and rules");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Dates are YYYY-MM-DD. The database path can also be set with SPENT_DB.");
}

// ── Budgets ──────────────────────────────────────────────────

fn cli_status(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let reference = date_flag(args, "--date", today)?;
    print_budget_table(&budgets_with_status(db, reference)?, reference);

    let (income, expense, balance) = db.get_totals()?;
    println!();
    println!(
        "Income {}  Expenses {}  Balance {}",
        format_amount(income),
        format_amount(expense),
        format_amount(balance)
    );
    Ok(())
}

fn cli_budgets(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let reference = date_flag(args, "--date", today)?;
    print_budget_table(&budgets_with_status(db, reference)?, reference);
    Ok(())
}

fn print_budget_table(statuses: &[BudgetStatus], reference: NaiveDate) {
    if statuses.is_empty() {
        println!("No budgets. Use `spent budget add <category> <amount>` to set one.");
        return;
    }

    println!("Budgets on {}", format_date(reference));
    println!("{}", "─".repeat(86));
    for s in statuses {
        println!(
            "{:<18} {:>12} / {:<12} {} {:>4}%  {} → {}",
            truncate(&s.category.name, 18),
            format_amount(s.spent),
            format_amount(s.budget.amount),
            progress_bar(s.percent, 20),
            s.percent.round(),
            format_date(s.window.start),
            format_date(s.window.end),
        );
    }

    let over: Vec<&str> = statuses
        .iter()
        .filter(|s| s.overspent)
        .map(|s| s.category.name.as_str())
        .collect();
    if !over.is_empty() {
        println!();
        println!("Over budget: {}", over.join(", "));
    }
}

fn cli_budget(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    match pos.as_slice() {
        ["add", category, amount] => {
            let category = budget_category(db, category)?;
            let budget = Budget::new(category_id(&category)?, parse_amount(amount)?, day_flag(args)?);
            let id = db.create_budget(&budget)?;
            println!(
                "Created budget {id}: {} {} per cycle, resetting on day {}",
                category.name,
                format_amount(budget.amount),
                budget.cycle_day
            );
            Ok(())
        }
        ["set", id, category, amount] => {
            let id = parse_id(id)?;
            let category = budget_category(db, category)?;
            let budget = Budget::new(category_id(&category)?, parse_amount(amount)?, day_flag(args)?);
            if !db.update_budget(id, &budget)? {
                anyhow::bail!("Budget {id} not found");
            }
            println!("Updated budget {id}");
            Ok(())
        }
        ["rm", id] => {
            let id = parse_id(id)?;
            if !db.delete_budget(id)? {
                anyhow::bail!("Budget {id} not found");
            }
            println!("Deleted budget {id}");
            Ok(())
        }
        _ => anyhow::bail!(
            "Usage: spent budget add <category> <amount> [--day N] | set <id> <category> <amount> [--day N] | rm <id>"
        ),
    }
}

/// Budgets may target any category; an expense category wins a name clash.
fn budget_category(db: &Database, name: &str) -> Result<Category> {
    db.find_category(name, None)?
        .ok_or_else(|| ValidationError::UnknownCategory(name.to_string()).into())
}

fn day_flag(args: &[String]) -> Result<i64> {
    flag(args, "--day")
        .map(|d| d.parse::<i64>().with_context(|| format!("Invalid day: {d}")))
        .transpose()
        .map(|d| d.unwrap_or(1))
}

// ── Recurring rules ──────────────────────────────────────────

fn cli_catch_up(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let up_to = date_flag(args, "--date", today)?;
    let report = apply_due_rules(db, up_to, today)?;
    println!(
        "Added {} recurring transactions up to {} ({} rules updated)",
        report.created,
        format_date(up_to),
        report.rules_updated
    );
    for failure in &report.failures {
        let id = failure
            .rule_id
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        eprintln!("  rule {id}: {:#}", failure.error);
    }
    if !report.is_clean() {
        anyhow::bail!("{} recurring rules could not be applied", report.failures.len());
    }
    Ok(())
}

fn cli_rules(db: &mut Database) -> Result<()> {
    let rules = db.get_recurring_rules()?;
    if rules.is_empty() {
        println!("No recurring rules");
        return Ok(());
    }
    let categories = db.get_categories(None)?;

    println!(
        "{:<4} {:<8} {:>12} {:<16} {:<14} {:<12} Note",
        "ID", "Type", "Amount", "Category", "Every", "Next"
    );
    println!("{}", "─".repeat(80));
    for rule in &rules {
        let category = rule
            .category_id
            .and_then(|id| Category::find_by_id(&categories, id))
            .map(|c| c.name.as_str())
            .unwrap_or("");
        let every = if rule.interval == 1 {
            rule.every.to_string()
        } else {
            format!("{} x{}", rule.every, rule.interval)
        };
        println!(
            "{:<4} {:<8} {:>12} {:<16} {:<14} {:<12} {}",
            rule.id.unwrap_or(0),
            rule.kind,
            format_amount(rule.amount),
            truncate(category, 16),
            every,
            rule.next_date.to_string(),
            rule.note,
        );
    }
    Ok(())
}

fn cli_rule(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let pos = positionals(args);
    match pos.as_slice() {
        ["add", kind, amount, category, every] => {
            let kind = parse_kind(kind)?;
            let every = Frequency::parse_strict(every)?;
            let interval = match flag(args, "--interval") {
                Some(raw) => {
                    let n: i64 = raw
                        .parse()
                        .with_context(|| format!("Invalid interval: {raw}"))?;
                    u32::try_from(n)
                        .ok()
                        .filter(|n| *n >= 1)
                        .ok_or(ValidationError::InvalidInterval(n))?
                }
                None => 1,
            };
            let next = date_flag(args, "--next", today)?;

            let mut rule = RecurringRule::new(kind, parse_amount(amount)?, every, next);
            rule.interval = interval;
            rule.category_id = Some(db.ensure_category(category, kind)?);
            fill_details(&mut rule.payment_method, &mut rule.tags, &mut rule.note, args);

            let id = db.insert_recurring_rule(&rule)?;
            println!("Created rule {id}: {kind} {} {every}, next on {}", format_amount(rule.amount), format_date(next));
            Ok(())
        }
        ["rm", id] => {
            let id = parse_id(id)?;
            if !db.delete_recurring_rule(id)? {
                anyhow::bail!("Rule {id} not found");
            }
            println!("Deleted rule {id}");
            Ok(())
        }
        _ => {
            let every: Vec<&str> = Frequency::all().iter().map(|f| f.as_str()).collect();
            anyhow::bail!(
                "Usage: spent rule add <income|expense> <amount> <category> <{}> [--interval N] [--next YYYY-MM-DD] | rm <id>",
                every.join("|")
            )
        }
    }
}

// ── Transactions ─────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let pos = positionals(args);
    let [kind, amount, category] = pos.as_slice() else {
        anyhow::bail!("Usage: spent add <income|expense> <amount> <category> [--date YYYY-MM-DD]");
    };
    let kind = parse_kind(kind)?;
    let mut txn = Transaction::new(date_flag(args, "--date", today)?, parse_amount(amount)?, kind);
    txn.category_id = Some(db.ensure_category(category, kind)?);
    fill_details(&mut txn.payment_method, &mut txn.tags, &mut txn.note, args);

    let id = db.insert_transaction(&txn)?;
    println!("Added {kind} {id}: {} on {}", format_amount(txn.amount), format_date(txn.date));
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let mut filter = TransactionFilter {
        from: optional_date(args, "--from")?,
        to: optional_date(args, "--to")?,
        kind: flag(args, "--type").map(parse_kind).transpose()?,
        ..Default::default()
    };
    if let Some(name) = flag(args, "--category") {
        let category = db
            .find_category(name, filter.kind)?
            .ok_or_else(|| ValidationError::UnknownCategory(name.to_string()))?;
        filter.category_id = category.id;
    }
    if let Some(raw) = flag(args, "--limit") {
        filter.limit = Some(raw.parse().with_context(|| format!("Invalid limit: {raw}"))?);
    }

    let txns = db.get_transactions(&filter)?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    let categories = db.get_categories(None)?;

    println!(
        "{:<5} {:<10} {:<8} {:>12} {:<16} {:<10} Note",
        "ID", "Date", "Type", "Amount", "Category", "Payment"
    );
    println!("{}", "─".repeat(80));
    for txn in &txns {
        let category = txn
            .category_id
            .and_then(|id| Category::find_by_id(&categories, id))
            .map(|c| c.name.as_str())
            .unwrap_or("");
        let note = if txn.recurring_id.is_some() {
            format!("{} (recurring)", txn.note)
        } else {
            txn.note.clone()
        };
        println!(
            "{:<5} {:<10} {:<8} {:>12} {:<16} {:<10} {}",
            txn.id.unwrap_or(0),
            format_date(txn.date),
            txn.kind,
            format_amount(txn.signed_amount()),
            truncate(category, 16),
            truncate(&txn.payment_method, 10),
            note.trim(),
        );
    }
    Ok(())
}

fn cli_show(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let pos = positionals(args);
    let [id] = pos.as_slice() else {
        anyhow::bail!("Usage: spent show <id>");
    };
    let id = parse_id(id)?;
    let txn = db
        .get_transaction(id)?
        .with_context(|| format!("Transaction {id} not found"))?;
    let category = match txn.category_id {
        Some(cid) => db.get_category_by_id(cid)?,
        None => None,
    };

    println!("Transaction {id}");
    println!("  Date:     {}", format_date(txn.date));
    println!("  Type:     {}", txn.kind);
    println!("  Amount:   {}", format_amount(txn.amount));
    println!("  Category: {}", category.as_ref().map_or("", |c| c.name.as_str()));
    println!("  Payment:  {}", txn.payment_method);
    println!("  Tags:     {}", txn.tags);
    println!("  Note:     {}", txn.note);
    if let Some(rule_id) = txn.recurring_id {
        println!("  Rule:     {rule_id}");
    }

    if txn.is_expense() {
        let budget = db
            .get_budgets()?
            .into_iter()
            .find(|(b, _)| Some(b.category_id) == txn.category_id);
        if let Some((budget, _)) = budget {
            let window = cycle_window(budget.cycle_day, today);
            let placement = if window.contains(txn.date) {
                "in"
            } else {
                "outside"
            };
            println!("  Budget:   {placement} the current cycle {window}");
        }
    }
    Ok(())
}

fn cli_txn(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let ["set", id] = pos.as_slice() else {
        anyhow::bail!(
            "Usage: spent txn set <id> [--date D] [--amount A] [--type T] [--category C] [--payment P] [--tags T] [--note N]"
        );
    };
    let id = parse_id(id)?;
    let mut txn = db
        .get_transaction(id)?
        .with_context(|| format!("Transaction {id} not found"))?;

    if let Some(date) = optional_date(args, "--date")? {
        txn.date = date;
    }
    if let Some(amount) = flag(args, "--amount") {
        txn.amount = parse_amount(amount)?;
    }
    if let Some(kind) = flag(args, "--type") {
        txn.kind = parse_kind(kind)?;
    }
    if let Some(category) = flag(args, "--category") {
        txn.category_id = Some(db.ensure_category(category, txn.kind)?);
    }
    fill_details(&mut txn.payment_method, &mut txn.tags, &mut txn.note, args);

    if !db.update_transaction(id, &txn)? {
        anyhow::bail!("Transaction {id} not found");
    }
    println!("Updated transaction {id}");
    Ok(())
}

fn cli_rm(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let [id] = pos.as_slice() else {
        anyhow::bail!("Usage: spent rm <id>");
    };
    let id = parse_id(id)?;
    if !db.delete_transaction(id)? {
        anyhow::bail!("Transaction {id} not found");
    }
    println!("Deleted transaction {id}");
    Ok(())
}

fn cli_summary(db: &mut Database) -> Result<()> {
    let (income, expense, balance) = db.get_totals()?;
    let count = db.get_transaction_count()?;

    println!("Spent - all time");
    println!("{}", "─".repeat(40));
    println!("  Income:     {}", format_amount(income));
    println!("  Expenses:   {}", format_amount(expense));
    println!("  Balance:    {}", format_amount(balance));
    println!("  Total Txns: {count}");
    Ok(())
}

// ── Reports ──────────────────────────────────────────────

fn cli_report(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    match pos.as_slice() {
        [] => {
            report_by_category(db)?;
            println!();
            report_by_month(db)?;
            println!();
            report_balance(db)
        }
        ["category"] => report_by_category(db),
        ["monthly"] => report_by_month(db),
        ["balance"] => report_balance(db),
        _ => anyhow::bail!("Usage: spent report [category|monthly|balance]"),
    }
}

fn report_by_category(db: &Database) -> Result<()> {
    println!("Expenses by category");
    println!("{}", "─".repeat(40));
    for (name, total) in db.get_expense_by_category()? {
        println!("  {:<22} {:>14}", truncate(&name, 22), format_amount(total));
    }
    Ok(())
}

fn report_by_month(db: &Database) -> Result<()> {
    println!("{:<8} {:>14} {:>14}", "Month", "Income", "Expenses");
    println!("{}", "─".repeat(40));
    for m in db.get_monthly_summary()? {
        println!(
            "{:<8} {:>14} {:>14}",
            m.month,
            format_amount(m.income),
            format_amount(m.expense)
        );
    }
    Ok(())
}

fn report_balance(db: &Database) -> Result<()> {
    println!("{:<10} {:>14}", "Date", "Balance");
    println!("{}", "─".repeat(40));
    for (date, balance) in db.get_balance_series()? {
        println!("{:<10} {:>14}", format_date(date), format_amount(balance));
    }
    Ok(())
}

// ── Categories ───────────────────────────────────────────────

fn cli_categories(db: &mut Database) -> Result<()> {
    println!("{:<4} {:<8} Name", "ID", "Type");
    println!("{}", "─".repeat(40));
    for kind in TxnKind::all() {
        for cat in &db.get_categories(Some(*kind))? {
            println!("{:<4} {:<8} {}", cat.id.unwrap_or(0), cat.kind, cat.name);
        }
    }
    Ok(())
}

fn cli_category(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    match pos.as_slice() {
        ["add", name, kind] => {
            let id = db.insert_category(&Category::new(name.to_string(), parse_kind(kind)?))?;
            println!("Created category {id}: {name}");
            Ok(())
        }
        ["rename", id, name] => {
            let id = parse_id(id)?;
            if !db.rename_category(id, name)? {
                anyhow::bail!("Category {id} not found");
            }
            println!("Renamed category {id} to {name}");
            Ok(())
        }
        ["rm", id] => {
            let id = parse_id(id)?;
            if !db.delete_category(id)? {
                anyhow::bail!("Category {id} not found");
            }
            println!("Deleted category {id}");
            Ok(())
        }
        _ => anyhow::bail!(
            "Usage: spent category add <name> <income|expense> | rename <id> <name> | rm <id>"
        ),
    }
}

// ── Settings & maintenance ───────────────────────────────────

fn cli_config(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    match pos.as_slice() {
        ["get", key] => {
            match db.get_setting(key)? {
                Some(value) => println!("{value}"),
                None => println!("{key} is not set"),
            }
            Ok(())
        }
        ["set", key, value] => {
            db.set_setting(key, value)?;
            println!("{key} = {value}");
            Ok(())
        }
        _ => anyhow::bail!("Usage: spent config get <key> | config set <key> <value>"),
    }
}

fn cli_backup(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let [path] = pos.as_slice() else {
        anyhow::bail!("Usage: spent backup <path>");
    };
    let path = expand_home(path);
    db.backup_to(Path::new(&path))?;
    println!("Backed up to {path}");
    Ok(())
}

fn cli_restore(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let [path] = pos.as_slice() else {
        anyhow::bail!("Usage: spent restore <path> --yes");
    };
    if !args.iter().any(|a| a == "--yes") {
        anyhow::bail!("This replaces all current data with the backup. Re-run with --yes to confirm.");
    }
    let path = expand_home(path);
    db.restore_from(Path::new(&path))?;
    println!("Restored from {path}");
    Ok(())
}

fn cli_wipe(args: &[String], db: &mut Database) -> Result<()> {
    if !args.iter().any(|a| a == "--yes") {
        anyhow::bail!("This deletes all transactions, budgets and rules. Re-run with --yes to confirm.");
    }
    db.wipe_all_data()?;
    println!("Deleted all transactions, budgets and recurring rules");
    Ok(())
}

// ── Argument helpers ─────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither options nor option values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn fill_details(payment_method: &mut String, tags: &mut String, note: &mut String, args: &[String]) {
    if let Some(p) = flag(args, "--payment") {
        *payment_method = p.to_string();
    }
    if let Some(t) = flag(args, "--tags") {
        *tags = t.to_string();
    }
    if let Some(n) = flag(args, "--note") {
        *note = n.to_string();
    }
}

fn optional_date(args: &[String], name: &str) -> Result<Option<NaiveDate>> {
    flag(args, name)
        .map(|raw| parse_date(raw).with_context(|| format!("Invalid date for {name}: {raw} (expected YYYY-MM-DD)")))
        .transpose()
}

fn date_flag(args: &[String], name: &str, default: NaiveDate) -> Result<NaiveDate> {
    Ok(optional_date(args, name)?.unwrap_or(default))
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim().trim_start_matches('$'))
        .with_context(|| format!("Invalid amount: {raw}"))
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().with_context(|| format!("Invalid id: {raw}"))
}

fn parse_kind(raw: &str) -> Result<TxnKind> {
    TxnKind::parse(raw).ok_or_else(|| ValidationError::UnknownKind(raw.to_string()).into())
}

fn category_id(category: &Category) -> Result<i64> {
    category
        .id
        .with_context(|| format!("Category {} has no id", category.name))
}
