mod budget_status;
mod config;
mod db;
mod error;
mod format;
mod logging;
mod models;
mod recurring;
mod run;
mod schedule;


use anyhow::Result;
use chrono::NaiveDate;

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let (db_override, args) = run::take_db_flag(&args);
    let db_path = config::resolve_db_path(db_override.as_deref())?;
    let mut db = db::Database::open(&db_path)?;
    let today = chrono::Local::now().date_naive();

    catch_up_on_start(&mut db, today);
    warn_if_overspent(&db, today);

    run::as_cli(&args, &mut db, today)
}

/// Materializes recurring transactions that fell due since the last launch.
/// Failures are logged and never stop the command from running.
fn catch_up_on_start(db: &mut db::Database, today: NaiveDate) {
    match recurring::apply_due_rules(db, today, today) {
        Ok(report) => {
            if report.created > 0 {
                tracing::info!(
                    created = report.created,
                    rules = report.rules_updated,
                    "Added due recurring transactions"
                );
            }
            if !report.is_clean() {
                tracing::warn!(
                    failed = report.failures.len(),
                    "Some recurring rules could not be applied; run `spent catch-up` for details"
                );
            }
        }
        Err(e) => tracing::error!("Recurring catch-up failed: {e:#}"),
    }
}

fn warn_if_overspent(db: &db::Database, today: NaiveDate) {
    match budget_status::any_budget_overspent(db, today) {
        Ok(true) => tracing::warn!("One or more budgets are over their limit this cycle"),
        Ok(false) => {}
        Err(e) => tracing::error!("Could not check budgets: {e:#}"),
    }
}
