//! Derived aggregates: trip summary, per-member balances and per-category
//! breakdown.
//!
//! Everything here is a pure function of the current record collection; the
//! same input always yields the same output. All functions are total — the
//! empty collection resolves to zeros and empty lists, never an error.
use serde::Serialize;

use crate::{
    category::Category,
    ledger::Ledger,
    money::MoneyWon,
    record::DateFilter,
    roster::MemberId,
};

/// Trip-level spending summary over the filtered view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_budget: MoneyWon,
    pub total_spent: MoneyWon,
    /// `total_budget - total_spent`; negative when over budget, not clamped.
    pub remaining: MoneyWon,
}

/// One member's trip-wide position.
///
/// `share` uses floor division per record (`cost / |involved|`), so the sum
/// of all diffs is a non-negative remainder bounded by one won per involved
/// member per record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MemberBalance {
    pub member: MemberId,
    pub share: MoneyWon,
    pub paid: MoneyWon,
    /// `paid - share`; positive = owed money, negative = owes money.
    pub diff: MoneyWon,
}

/// Spending of one category over the filtered view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub amount: MoneyWon,
    /// Share of the filtered total, rounded half-up to a whole percent.
    pub percent: u32,
}

impl Ledger {
    /// Totals over the filtered view. The budget comes from trip
    /// configuration, not from records.
    #[must_use]
    pub fn summary(&self, total_budget: MoneyWon, filter: DateFilter) -> Summary {
        let total_spent = self
            .filtered(filter)
            .fold(MoneyWon::ZERO, |acc, record| acc + record.cost);
        Summary {
            total_budget,
            total_spent,
            remaining: total_budget - total_spent,
        }
    }

    /// Per-category totals over the filtered view, in [`Category::ALL`]
    /// order. Categories with no matching records are omitted.
    #[must_use]
    pub fn category_stats(&self, filter: DateFilter) -> Vec<CategoryBreakdown> {
        let mut amounts = [MoneyWon::ZERO; Category::ALL.len()];
        let mut counts = [0usize; Category::ALL.len()];
        let mut total = MoneyWon::ZERO;

        for record in self.filtered(filter) {
            let slot = Category::ALL
                .iter()
                .position(|c| *c == record.category)
                .unwrap_or(Category::ALL.len() - 1);
            amounts[slot] += record.cost;
            counts[slot] += 1;
            total += record.cost;
        }

        Category::ALL
            .iter()
            .enumerate()
            .filter(|(slot, _)| counts[*slot] > 0)
            .map(|(slot, category)| CategoryBreakdown {
                category: *category,
                amount: amounts[slot],
                percent: percent_of(amounts[slot], total),
            })
            .collect()
    }

    /// Per-member balances over the **unfiltered** collection, in roster
    /// order. Balances are trip-wide; date filtering scopes the visible
    /// ledger only, never who-owes-whom.
    #[must_use]
    pub fn member_stats(&self) -> Vec<MemberBalance> {
        let mut shares = vec![MoneyWon::ZERO; self.roster().len()];
        let mut paid = vec![MoneyWon::ZERO; self.roster().len()];

        for record in self.records() {
            let share = record.share();
            for member in &record.involved {
                shares[member.index()] += share;
            }
            paid[record.payer.index()] += record.cost;
        }

        self.roster()
            .members()
            .map(|member| MemberBalance {
                member,
                share: shares[member.index()],
                paid: paid[member.index()],
                diff: paid[member.index()] - shares[member.index()],
            })
            .collect()
    }
}

/// Whole-percent share of `amount` in `total`, rounded half-up without
/// leaving integer arithmetic. Zero when the total is zero.
fn percent_of(amount: MoneyWon, total: MoneyWon) -> u32 {
    if !total.is_positive() {
        return 0;
    }
    ((amount.won() * 200 + total.won()) / (2 * total.won())) as u32
}
