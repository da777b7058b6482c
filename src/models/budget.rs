use rust_decimal::Decimal;

use crate::schedule::clamp_cycle_day;

/// A spending cap for one category, reset every month on `cycle_day`.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: Option<i64>,
    pub category_id: i64,
    pub amount: Decimal,
    /// Always within 1..=28.
    pub cycle_day: u32,
}

impl Budget {
    pub fn new(category_id: i64, amount: Decimal, cycle_day: i64) -> Self {
        Self {
            id: None,
            category_id,
            amount,
            cycle_day: clamp_cycle_day(cycle_day),
        }
    }
}
