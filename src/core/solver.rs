use super::types::Precision;

pub const SOLVER_TOLERANCE: f64 = 1e-6;
const INITIAL_GUESS: f64 = 0.05;

pub fn fixed_rate_payment(principal: f64, rate: f64, years: u32) -> f64 {
    let n = years as f64;
    if rate == 0.0 {
        return principal / n;
    }
    principal * rate / (1.0 - (1.0 + rate).powf(-n))
}

/// Bisection over `[0, 1]`; relies on the annuity total growing monotonically
/// with the rate. `total_years` must be > 0.
pub fn equivalent_fixed_rate(
    initial_principal: f64,
    total_interest_paid: f64,
    total_years: u32,
) -> f64 {
    let target = initial_principal + total_interest_paid;
    let n = total_years as f64;

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    let mut guess = INITIAL_GUESS;
    while hi - lo > SOLVER_TOLERANCE {
        let total_payment = fixed_rate_payment(initial_principal, guess, total_years) * n;
        if total_payment < target {
            lo = guess;
        } else {
            hi = guess;
        }
        guess = (lo + hi) * 0.5;
    }

    Precision::Rate.round(guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn payment_matches_closed_form() {
        // 100k over 10 years at 5%: 12950.46 per year.
        assert_close(fixed_rate_payment(100_000.0, 0.05, 10), 12_950.4575, 1e-3);
    }

    #[test]
    fn payment_at_zero_rate_is_straight_line() {
        assert_close(fixed_rate_payment(120_000.0, 0.0, 12), 10_000.0, 1e-9);
    }

    #[test]
    fn recovers_rate_of_a_level_annuity() {
        let principal = 300_000.0;
        let years = 30;
        let rate = 0.02;
        let interest = fixed_rate_payment(principal, rate, years) * years as f64 - principal;

        let solved = equivalent_fixed_rate(principal, interest, years);
        assert_close(solved, rate, 2e-5);
    }

    #[test]
    fn zero_interest_solves_to_zero_rate() {
        let solved = equivalent_fixed_rate(200_000.0, 0.0, 20);
        assert_close(solved, 0.0, 1e-5);
    }

    #[test]
    fn solver_is_idempotent() {
        let a = equivalent_fixed_rate(540_000.0, 150_000.0, 30);
        let b = equivalent_fixed_rate(540_000.0, 150_000.0, 30);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn solved_rate_reproduces_total_cost(
            principal in 10_000.0f64..1_000_000.0,
            rate in 0.001f64..0.15,
            years in 1u32..40,
        ) {
            let target_total = fixed_rate_payment(principal, rate, years) * years as f64;
            let interest = target_total - principal;
            let solved = equivalent_fixed_rate(principal, interest, years);
            prop_assert!((solved - rate).abs() <= 2e-5);

            let total = fixed_rate_payment(principal, solved, years) * years as f64;
            // The bracket and the final 5-decimal rounding bound the relative error.
            let d_total_d_rate = principal * years as f64 * years as f64;
            prop_assert!((total - target_total).abs() <= 2e-5 * d_total_d_rate);
        }
    }
}
