//! Turns due recurring rules into transactions.
//!
//! A catch-up walks every rule, emits one transaction per due date up to the
//! horizon and moves the rule's `next_date` past it. Each rule is committed
//! on its own, so one broken rule never blocks the others.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{DueDate, RecurringRule, Transaction};
use crate::schedule::{advance, advance_stored};

/// Storage needed by a catch-up run.
pub(crate) trait RuleStore {
    fn recurring_rules(&self) -> Result<Vec<RecurringRule>>;

    /// Persist `occurrences` and move the rule to `next_date` as one unit of
    /// work: either everything is stored or nothing is.
    fn commit_occurrences(
        &mut self,
        rule_id: i64,
        occurrences: &[Transaction],
        next_date: NaiveDate,
    ) -> Result<()>;
}

#[derive(Debug)]
pub(crate) struct RuleFailure {
    pub(crate) rule_id: Option<i64>,
    pub(crate) error: anyhow::Error,
}

#[derive(Debug, Default)]
pub(crate) struct CatchUpReport {
    /// Transactions created across all rules.
    pub(crate) created: usize,
    /// Rules whose due date was moved.
    pub(crate) rules_updated: usize,
    pub(crate) failures: Vec<RuleFailure>,
}

impl CatchUpReport {
    pub(crate) fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The due dates of a rule up to a horizon, and where the rule lands after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Plan {
    pub(crate) due: Vec<NaiveDate>,
    pub(crate) next_date: NaiveDate,
}

/// Computes every occurrence of `rule` on or before `up_to`.
///
/// A rule whose stored due date is unreadable is rebased on `today` first.
/// The returned `next_date` is always after `up_to`.
pub(crate) fn plan_occurrences(rule: &RecurringRule, up_to: NaiveDate, today: NaiveDate) -> Result<Plan> {
    let mut next = match &rule.next_date {
        DueDate::On(date) => *date,
        DueDate::Unreadable(raw) => advance_stored(raw, rule.every, rule.interval, today),
    };

    let mut due = Vec::new();
    while next <= up_to {
        let following = advance(next, rule.every, rule.interval);
        if following <= next {
            anyhow::bail!("Schedule cannot advance past {next}");
        }
        due.push(next);
        next = following;
    }

    Ok(Plan { due, next_date: next })
}

/// Materializes every rule occurrence due on or before `up_to`.
///
/// Only a failure to list the rules is returned as `Err`; failures of
/// individual rules are logged and collected in the report while the
/// remaining rules are still processed. Running it again with the same
/// horizon creates nothing.
pub(crate) fn apply_due_rules<S>(store: &mut S, up_to: NaiveDate, today: NaiveDate) -> Result<CatchUpReport>
where
    S: RuleStore + ?Sized,
{
    let rules = store
        .recurring_rules()
        .context("Failed to load recurring rules")?;

    let mut report = CatchUpReport::default();
    for rule in &rules {
        let _span = tracing::info_span!("rule", id = ?rule.id).entered();
        match apply_rule(store, rule, up_to, today) {
            Ok(None) => {}
            Ok(Some(created)) => {
                report.created += created;
                report.rules_updated += 1;
            }
            Err(error) => {
                tracing::error!("Recurring rule failed: {error:#}");
                report.failures.push(RuleFailure {
                    rule_id: rule.id,
                    error,
                });
            }
        }
    }

    tracing::info!(
        created = report.created,
        rules_updated = report.rules_updated,
        failed = report.failures.len(),
        %up_to,
        "Recurring catch-up finished"
    );
    Ok(report)
}

/// `Some(count)` when the rule was written, `None` when it was already current.
fn apply_rule<S>(store: &mut S, rule: &RecurringRule, up_to: NaiveDate, today: NaiveDate) -> Result<Option<usize>>
where
    S: RuleStore + ?Sized,
{
    let rule_id = rule.id.context("Recurring rule has no id")?;
    let plan = plan_occurrences(rule, up_to, today)?;

    if plan.due.is_empty() && rule.next_date.date() == Some(plan.next_date) {
        return Ok(None);
    }

    let occurrences: Vec<Transaction> = plan.due.iter().map(|d| rule.occurrence(*d)).collect();
    store
        .commit_occurrences(rule_id, &occurrences, plan.next_date)
        .with_context(|| format!("Failed to record occurrences for rule {rule_id}"))?;

    tracing::debug!(
        created = occurrences.len(),
        next_date = %plan.next_date,
        "Advanced recurring rule"
    );
    Ok(Some(occurrences.len()))
}
