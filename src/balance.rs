//! The running balance shown on the dashboard and the transactions page.

use crate::models::Transaction;

/// Sum of income amounts minus everything else.
///
/// The result only reflects the transactions passed in, so for a partial page
/// it is the balance of that page. A `NaN` amount makes the result `NaN`.
pub fn derived_balance<'a, I>(transactions: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(0.0, |total, t| total + t.kind.sign() * t.amount)
}
