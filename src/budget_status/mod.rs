//! Live budget status: how much of each budget's current cycle is spent.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Budget, Category};
use crate::schedule::{cycle_window, CycleWindow};

/// Storage needed to evaluate budgets.
pub(crate) trait BudgetStore {
    fn budgets_with_categories(&self) -> Result<Vec<(Budget, Category)>>;

    /// Sum of expense transactions of `category_id` dated inside `window`.
    fn expense_total(&self, category_id: i64, window: &CycleWindow) -> Result<Decimal>;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetStatus {
    pub(crate) budget: Budget,
    pub(crate) category: Category,
    pub(crate) window: CycleWindow,
    pub(crate) spent: Decimal,
    /// Negative once overspent.
    pub(crate) remaining: Decimal,
    pub(crate) percent: Decimal,
    pub(crate) overspent: bool,
}

impl BudgetStatus {
    /// Fails instead of overflowing when `spent` and the cap are too far
    /// apart to express as a percentage.
    pub(crate) fn new(budget: Budget, category: Category, window: CycleWindow, spent: Decimal) -> Result<Self> {
        let remaining = budget
            .amount
            .checked_sub(spent)
            .with_context(|| format!("Remaining amount of the {} budget overflowed", category.name))?;
        let percent = if budget.amount > Decimal::ZERO {
            spent
                .checked_div(budget.amount)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .with_context(|| format!("Spent percentage of the {} budget overflowed", category.name))?
        } else {
            Decimal::ZERO
        };
        Ok(Self {
            budget,
            category,
            window,
            spent,
            remaining,
            percent,
            overspent: remaining < Decimal::ZERO,
        })
    }
}

/// Status of every budget for the cycle containing `reference`.
pub(crate) fn budgets_with_status<S>(store: &S, reference: NaiveDate) -> Result<Vec<BudgetStatus>>
where
    S: BudgetStore + ?Sized,
{
    store
        .budgets_with_categories()?
        .into_iter()
        .map(|(budget, category)| {
            let window = cycle_window(budget.cycle_day, reference);
            let spent = store.expense_total(budget.category_id, &window)?;
            BudgetStatus::new(budget, category, window, spent)
        })
        .collect()
}

/// True if any budget is over its cap in the cycle containing `reference`.
/// Always recomputed from storage.
pub(crate) fn any_budget_overspent<S>(store: &S, reference: NaiveDate) -> Result<bool>
where
    S: BudgetStore + ?Sized,
{
    Ok(budgets_with_status(store, reference)?
        .iter()
        .any(|status| status.overspent))
}
