//! Cross-condition comparison of simulated totals, the textual counterpart of
//! a box plot per offer.

use serde::Serialize;
use tabled::{Table, builder::Builder};

use crate::core::{AverageWithPercentiles, ConditionResult, Precision, average_with_percentiles};

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    pub total_years: u32,
    pub total_paid: AverageWithPercentiles,
    pub monthly_payment: AverageWithPercentiles,
    pub equivalent_fixed_rate: AverageWithPercentiles,
}

pub fn comparison_rows(results: &[ConditionResult]) -> Vec<ComparisonRow> {
    results
        .iter()
        .map(|result| {
            let mut total_paid = result.stats.iter().map(|s| s.total_paid).collect::<Vec<_>>();
            let mut monthly = result
                .stats
                .iter()
                .map(|s| s.average_monthly_payment)
                .collect::<Vec<_>>();
            let mut rates = result
                .stats
                .iter()
                .map(|s| s.equivalent_fixed_interest_rate)
                .collect::<Vec<_>>();

            ComparisonRow {
                name: result.name.clone(),
                total_years: result.stats.first().map(|s| s.total_years).unwrap_or(0),
                total_paid: average_with_percentiles(&mut total_paid, Precision::Money),
                monthly_payment: average_with_percentiles(&mut monthly, Precision::Money),
                equivalent_fixed_rate: average_with_percentiles(&mut rates, Precision::Rate),
            }
        })
        .collect()
}

pub fn render_table(rows: &[ComparisonRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Condition",
        "Years",
        "Total paid (mean)",
        "Total paid (p10 / p50 / p90)",
        "Monthly (mean)",
        "Monthly (p10 / p50 / p90)",
        "Equivalent fixed rate",
    ]);
    for row in rows {
        builder.push_record([
            row.name.clone(),
            row.total_years.to_string(),
            format_money(row.total_paid.average),
            format_spread(&row.total_paid),
            format_money(row.monthly_payment.average),
            format_spread(&row.monthly_payment),
            format!("{:.3}%", row.equivalent_fixed_rate.average * 100.0),
        ]);
    }
    Table::from(builder).to_string()
}

fn format_money(value: f64) -> String {
    format!("{value:.2}")
}

fn format_spread(summary: &AverageWithPercentiles) -> String {
    format!(
        "{} / {} / {}",
        format_money(summary.percentile_10),
        format_money(summary.percentile_50),
        format_money(summary.percentile_90)
    )
}
