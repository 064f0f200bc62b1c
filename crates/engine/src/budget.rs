//! The module contains the budget arithmetic. Given project lines and a way
//! to resolve part ids, it produces the workshop's cost, the customer's
//! price and the margin between them.
//!
//! Lines whose part id no longer resolves are skipped on both sides of the
//! ledger, so deleting a catalog part degrades old budgets instead of
//! breaking them.

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::{MoneyCents, catalog::PartLookup, projects::ProjectItem};

/// The financial outcome of a list of project lines.
///
/// Only the two totals are stored; profit and margin are derived from them,
/// so they can never drift apart. Totals are exact cent sums, which makes
/// summaries of disjoint line lists addable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BudgetSummary {
    /// What the materials cost the workshop.
    pub total_cost: MoneyCents,
    /// What the customer is quoted.
    pub total_sale: MoneyCents,
}

impl BudgetSummary {
    pub fn profit(&self) -> MoneyCents {
        self.total_sale - self.total_cost
    }

    /// Profit as a percentage of the sale, `0.0` when nothing is sold.
    pub fn margin_percent(&self) -> f64 {
        margin_percent(self.profit(), self.total_sale)
    }
}

impl Add for BudgetSummary {
    type Output = BudgetSummary;

    fn add(self, rhs: BudgetSummary) -> BudgetSummary {
        BudgetSummary {
            total_cost: self.total_cost + rhs.total_cost,
            total_sale: self.total_sale + rhs.total_sale,
        }
    }
}

impl AddAssign for BudgetSummary {
    fn add_assign(&mut self, rhs: BudgetSummary) {
        self.total_cost += rhs.total_cost;
        self.total_sale += rhs.total_sale;
    }
}

impl Sum for BudgetSummary {
    fn sum<I: Iterator<Item = BudgetSummary>>(iter: I) -> BudgetSummary {
        iter.fold(BudgetSummary::default(), |acc, summary| acc + summary)
    }
}

/// Profit as a percentage of the sale price.
///
/// A sale of zero (or less) yields `0.0` rather than a division by zero;
/// an empty or fully unsold budget has no margin to speak of.
pub fn margin_percent(profit: MoneyCents, sale: MoneyCents) -> f64 {
    if sale.is_positive() {
        profit.as_cents() as f64 / sale.as_cents() as f64 * 100.0
    } else {
        0.0
    }
}

/// Computes the budget of a list of project lines against a part lookup.
///
/// Each resolved line contributes `purchase_price × quantity` to the cost
/// and `price × quantity` to the sale, rounded to the cent per line. The
/// totals are plain integer sums, so the result does not depend on the
/// order of the lines.
pub fn compute_budget<'a, I>(items: I, parts: &(impl PartLookup + ?Sized)) -> BudgetSummary
where
    I: IntoIterator<Item = &'a ProjectItem>,
{
    let mut summary = BudgetSummary::default();

    for item in items {
        let Some(part) = parts.part(&item.part_id) else {
            continue;
        };
        summary.total_cost += part.purchase_price.times(item.quantity);
        summary.total_sale += part.price.times(item.quantity);
    }

    summary
}

/// Breaks the sale value down by part category. Unresolved lines are
/// skipped; the map orders categories alphabetically.
pub fn sale_by_category<'a, I>(
    items: I,
    parts: &(impl PartLookup + ?Sized),
) -> BTreeMap<String, MoneyCents>
where
    I: IntoIterator<Item = &'a ProjectItem>,
{
    let mut buckets = BTreeMap::new();

    for item in items {
        let Some(part) = parts.part(&item.part_id) else {
            continue;
        };
        let value = part.price.times(item.quantity);
        *buckets.entry(part.category.clone()).or_insert(MoneyCents::ZERO) += value;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quantity, catalog::default_parts};

    fn item(part_id: &str, hundredths: i64) -> ProjectItem {
        ProjectItem::new(part_id, Quantity::from_hundredths(hundredths))
    }

    #[test]
    fn computes_the_wardrobe_example() {
        let parts = default_parts();
        let items = [item("1", 200), item("2", 1000)];

        let summary = compute_budget(&items, parts.as_slice());

        assert_eq!(summary.total_cost, MoneyCents::new(108, 0));
        assert_eq!(summary.total_sale, MoneyCents::new(213, 0));
        assert_eq!(summary.profit(), MoneyCents::new(105, 0));
        assert!((summary.margin_percent() - 49.295_774_647_887_32).abs() < 1e-9);
    }

    #[test]
    fn dangling_lines_are_skipped_on_both_sides() {
        let parts = default_parts();
        let items = [item("999", 500), item("1", 100)];

        let summary = compute_budget(&items, parts.as_slice());

        assert_eq!(summary.total_cost, MoneyCents::new(45, 0));
        assert_eq!(summary.total_sale, MoneyCents::new(85, 50));
        assert_eq!(summary.profit(), MoneyCents::new(40, 50));
        assert!((summary.margin_percent() - 47.368_421_052_631_58).abs() < 1e-9);
    }

    #[test]
    fn empty_projects_cost_nothing() {
        let parts = default_parts();
        let summary = compute_budget(&[], parts.as_slice());

        assert_eq!(summary, BudgetSummary::default());
        assert_eq!(summary.profit(), MoneyCents::ZERO);
        assert_eq!(summary.margin_percent(), 0.0);
    }

    #[test]
    fn margin_of_an_unsold_budget_is_zero() {
        assert_eq!(margin_percent(MoneyCents::new(-3, 0), MoneyCents::ZERO), 0.0);
        assert_eq!(margin_percent(MoneyCents::ZERO, MoneyCents::cents(-100)), 0.0);

        // Selling below cost still has a margin, a negative one.
        let below_cost = BudgetSummary {
            total_cost: MoneyCents::new(10, 0),
            total_sale: MoneyCents::new(8, 0),
        };
        assert_eq!(below_cost.profit(), MoneyCents::new(-2, 0));
        assert!(below_cost.margin_percent() < 0.0);
    }

    #[test]
    fn fractional_quantities_round_per_line() {
        let parts = default_parts();
        // 2.5m of edge band: 0.45€ -> 1.13€ cost, 1.15€ -> 2.88€ sale.
        let items = [item("7", 250)];

        let summary = compute_budget(&items, parts.as_slice());

        assert_eq!(summary.total_cost, MoneyCents::cents(113));
        assert_eq!(summary.total_sale, MoneyCents::cents(288));
        assert_eq!(summary.profit(), MoneyCents::cents(175));
    }

    #[test]
    fn summaries_add_fieldwise() {
        let a = BudgetSummary {
            total_cost: MoneyCents::new(1, 0),
            total_sale: MoneyCents::new(3, 0),
        };
        let b = BudgetSummary {
            total_cost: MoneyCents::new(2, 0),
            total_sale: MoneyCents::new(4, 0),
        };

        let total: BudgetSummary = [a, b].into_iter().sum();
        assert_eq!(total, a + b);
        assert_eq!(total.total_cost, MoneyCents::new(3, 0));
        assert_eq!(total.total_sale, MoneyCents::new(7, 0));
    }

    #[test]
    fn category_breakdown_groups_sale_values() {
        let parts = default_parts();
        let items = [item("2", 400), item("1", 100), item("4", 100), item("999", 100)];

        let breakdown = sale_by_category(&items, parts.as_slice());

        assert_eq!(breakdown.len(), 2);
        // Hinges and slides share the Ferragem bucket.
        assert_eq!(breakdown["Ferragem"], MoneyCents::cents(4 * 420 + 1280));
        assert_eq!(breakdown["Madeira"], MoneyCents::new(85, 50));
    }
}
