use super::types::{Inputs, MortgageCondition, YearlyExpenses};

pub fn default_inputs() -> Inputs {
    Inputs {
        principal: 540_000.0,
        current_euribor: 0.007,
        yearly_volatility: 0.003,
        yearly_expenses: YearlyExpenses::from_items([
            ("community", 3_000.0),
            ("fixes", 1_000.0),
            ("ibi", 1_100.0),
            ("house_insurance", 670.0),
            ("other", 0.0),
        ]),
    }
}

fn condition(
    name: &str,
    rate: f64,
    fixed_period: u32,
    euribor_delta: f64,
    total_years: u32,
    bonifications: (f64, f64),
) -> MortgageCondition {
    MortgageCondition {
        name: name.to_string(),
        rate,
        fixed_period,
        euribor_delta,
        total_years,
        fixed_period_bonification: bonifications.0,
        after_fixed_period_bonification: bonifications.1,
    }
}

pub fn default_conditions() -> Vec<MortgageCondition> {
    vec![
        condition("fixed_30", 0.019, 30, 0.0, 30, (1_300.0, 1_300.0)),
        condition("mixed_30", 0.017, 10, 0.008, 30, (0.0, 1_300.0)),
        condition("mixed_no_bonificada_30", 0.017, 10, 0.018, 30, (0.0, 0.0)),
        condition("variable_30", 0.013, 5, 0.008, 30, (1_300.0, 1_300.0)),
        condition("fixed_20", 0.019, 20, 0.0, 20, (1_300.0, 1_300.0)),
        condition("mixed_20", 0.017, 10, 0.008, 20, (0.0, 1_300.0)),
        condition("mixed_no_bonificada_20", 0.017, 10, 0.018, 20, (0.0, 0.0)),
        condition("variable_20", 0.013, 5, 0.008, 20, (1_300.0, 1_300.0)),
        condition("fixed_10", 0.019, 10, 0.0, 10, (1_300.0, 1_300.0)),
        condition("variable_10", 0.013, 5, 0.008, 10, (1_300.0, 1_300.0)),
    ]
}
