use std::collections::BTreeMap;

use super::solver::equivalent_fixed_rate;
use super::types::{
    AverageWithPercentiles, MortgageCondition, MortgagePayment, MortgageStats, PaymentField,
    Precision, SummarizedMortgagePayment,
};

/// Rate averages include the year-0 snapshot.
pub fn summarize_run(
    payments: &[MortgagePayment],
    condition: &MortgageCondition,
    yearly_expenses_total: f64,
    label: &str,
) -> MortgageStats {
    let count = payments.len().max(1) as f64;
    let initial_principal = payments.first().map(|p| p.principal).unwrap_or(0.0);

    let mut sum_euribor = 0.0;
    let mut sum_interest_rate = 0.0;
    let mut sum_interest_paid = 0.0;
    let mut sum_capital_paid = 0.0;
    let mut sum_bonification = 0.0;
    for payment in payments {
        sum_euribor += payment.euribor;
        sum_interest_rate += payment.interest_rate;
        sum_interest_paid += payment.interest_paid;
        sum_capital_paid += payment.capital_paid;
        sum_bonification += payment.bonification;
    }

    let total_years = condition.total_years;
    let sum_expenses = yearly_expenses_total * total_years as f64;
    let paid_without_expenses = sum_interest_paid + sum_capital_paid + sum_bonification;
    let paid = paid_without_expenses + sum_expenses;
    let equivalent_rate = equivalent_fixed_rate(initial_principal, sum_interest_paid, total_years);

    MortgageStats {
        average_euribor: Precision::Rate.round(sum_euribor / count),
        average_interest_rate: Precision::Rate.round(sum_interest_rate / count),
        equivalent_fixed_interest_rate: Precision::Rate.round(equivalent_rate),
        total_interest_paid: Precision::Money.round(sum_interest_paid),
        total_capital_paid: Precision::Money.round(sum_capital_paid),
        total_expenses: Precision::Money.round(sum_expenses),
        total_bonification_payments: Precision::Money.round(sum_bonification),
        total_paid: Precision::Money.round(paid),
        total_paid_without_expenses: Precision::Money.round(paid_without_expenses),
        average_monthly_payment: Precision::Money.round(paid / total_years as f64 / 12.0),
        total_years,
        label: label.to_string(),
    }
}

pub fn summarize_runs<S: AsRef<[MortgagePayment]>>(runs: &[S]) -> Vec<SummarizedMortgagePayment> {
    let mut by_year: BTreeMap<u32, [Vec<f64>; 7]> = BTreeMap::new();
    for run in runs {
        for payment in run.as_ref() {
            let samples = by_year
                .entry(payment.year)
                .or_insert_with(|| std::array::from_fn(|_| Vec::with_capacity(runs.len())));
            for (field, values) in PaymentField::ALL.iter().zip(samples.iter_mut()) {
                values.push(field.value(payment));
            }
        }
    }

    by_year
        .into_iter()
        .map(|(year, mut samples)| {
            let fields: [AverageWithPercentiles; 7] = std::array::from_fn(|idx| {
                average_with_percentiles(&mut samples[idx], PaymentField::ALL[idx].precision())
            });
            let [
                euribor,
                interest_rate,
                principal,
                interest_paid,
                capital_paid,
                bonification,
                real_interest_rate,
            ] = fields;
            SummarizedMortgagePayment {
                year,
                euribor,
                interest_rate,
                principal,
                interest_paid,
                capital_paid,
                bonification,
                real_interest_rate,
            }
        })
        .collect()
}

// Sorts `values` in place.
pub fn average_with_percentiles(values: &mut [f64], precision: Precision) -> AverageWithPercentiles {
    values.sort_by(|a, b| a.total_cmp(b));
    let sorted: &[f64] = values;
    let average = if sorted.is_empty() {
        0.0
    } else {
        sorted.iter().sum::<f64>() / sorted.len() as f64
    };
    let at = |p: f64| precision.round(percentile(sorted, p));

    AverageWithPercentiles {
        average: precision.round(average),
        percentile_10: at(10.0),
        percentile_20: at(20.0),
        percentile_30: at(30.0),
        percentile_40: at(40.0),
        percentile_50: at(50.0),
        percentile_60: at(60.0),
        percentile_70: at(70.0),
        percentile_80: at(80.0),
        percentile_90: at(90.0),
    }
}

// `sorted` must be ascending; `p` is in percent.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let w = rank - lower as f64;
        sorted[lower] * (1.0 - w) + sorted[upper] * w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn condition(total_years: u32) -> MortgageCondition {
        MortgageCondition {
            name: "fixed".to_string(),
            rate: 0.02,
            fixed_period: total_years,
            euribor_delta: 0.0,
            total_years,
            fixed_period_bonification: 100.0,
            after_fixed_period_bonification: 100.0,
        }
    }

    fn payment(year: u32, euribor: f64, principal: f64) -> MortgagePayment {
        MortgagePayment {
            year,
            euribor,
            interest_rate: 0.02,
            principal,
            interest_paid: if year == 0 { 0.0 } else { 200.0 },
            capital_paid: if year == 0 { 0.0 } else { 500.0 },
            bonification: if year == 0 { 0.0 } else { 100.0 },
            real_interest_rate: 0.03,
        }
    }

    fn two_year_run() -> Vec<MortgagePayment> {
        vec![
            payment(0, 0.01, 1000.0),
            payment(1, 0.02, 500.0),
            payment(2, 0.03, 0.0),
        ]
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_approx(percentile(&sorted, 50.0), 3.0);
        assert_approx(percentile(&sorted, 10.0), 1.4);
        assert_approx(percentile(&sorted, 90.0), 4.6);
        assert_approx(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn single_sample_fills_every_percentile() {
        let summary = average_with_percentiles(&mut [0.01234], Precision::Rate);
        assert_approx(summary.average, 0.01234);
        for value in summary.deciles() {
            assert_approx(value, 0.01234);
        }
    }

    #[test]
    fn run_stats_average_includes_year_zero() {
        let stats = summarize_run(&two_year_run(), &condition(2), 50.0, "fixed");
        assert_approx(stats.average_euribor, 0.02);
        assert_approx(stats.total_interest_paid, 400.0);
        assert_approx(stats.total_capital_paid, 1000.0);
        assert_approx(stats.total_bonification_payments, 200.0);
        assert_approx(stats.total_expenses, 100.0);
        assert_approx(stats.total_paid_without_expenses, 1600.0);
        assert_approx(stats.total_paid, 1700.0);
        assert_approx(stats.average_monthly_payment, 70.83);
        assert_eq!(stats.total_years, 2);
        assert_eq!(stats.label, "fixed");
    }

    #[test]
    fn run_stats_solves_equivalent_rate_from_interest() {
        let stats = summarize_run(&two_year_run(), &condition(2), 0.0, "fixed");
        assert_eq!(
            stats.equivalent_fixed_interest_rate,
            equivalent_fixed_rate(1000.0, 400.0, 2)
        );
        assert!(stats.equivalent_fixed_interest_rate > 0.2);
    }

    #[test]
    fn summarize_runs_groups_by_year_in_ascending_order() {
        let mut shifted = two_year_run();
        shifted[1].principal = 700.0;
        shifted.reverse();
        let summary = summarize_runs(&[two_year_run(), shifted]);

        assert_eq!(summary.len(), 3);
        assert_eq!(
            summary.iter().map(|s| s.year).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_approx(summary[1].principal.average, 600.0);
        assert_approx(summary[1].principal.percentile_50, 600.0);
        assert_approx(summary[1].principal.percentile_10, 520.0);
        assert_approx(summary[0].interest_paid.average, 0.0);
    }

    #[test]
    fn summarize_runs_rounds_per_field() {
        let mut a = two_year_run();
        let mut b = two_year_run();
        a[1].euribor = 0.011111;
        b[1].euribor = 0.011114;
        a[1].principal = 500.004;
        b[1].principal = 500.0;
        let summary = summarize_runs(&[a, b]);
        assert_approx(summary[1].euribor.average, 0.01111);
        assert_approx(summary[1].principal.average, 500.0);
    }

    #[test]
    fn summarize_runs_of_nothing_is_empty() {
        let runs: Vec<Vec<MortgagePayment>> = Vec::new();
        assert!(summarize_runs(&runs).is_empty());
    }

    proptest! {
        #[test]
        fn deciles_are_monotonic(values in vec(-1.0e6f64..1.0e6, 1..200)) {
            let mut values = values;
            let summary = average_with_percentiles(&mut values, Precision::Money);
            let deciles = summary.deciles();
            for pair in deciles.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }

        #[test]
        fn single_sample_is_every_statistic(value in -1.0f64..1.0) {
            let summary = average_with_percentiles(&mut [value], Precision::Rate);
            let expected = Precision::Rate.round(value);
            prop_assert_eq!(summary.average, expected);
            for decile in summary.deciles() {
                prop_assert_eq!(decile, expected);
            }
        }
    }
}
