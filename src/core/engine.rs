use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::error::SimulationError;
use super::rates::RatePath;
use super::solver::fixed_rate_payment;
use super::summary::{summarize_run, summarize_runs};
use super::types::{
    Inputs, MAX_TOTAL_YEARS, MortgageCondition, MortgagePayment, MortgageStats, Precision,
    SummarizedMortgagePayment,
};

pub const DEFAULT_RUNS: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct MonteCarloConfig {
    pub runs: usize,
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionResult {
    pub name: String,
    pub stats: Vec<MortgageStats>,
    pub yearly: Vec<SummarizedMortgagePayment>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearSplit {
    pub interest: f64,
    pub capital: f64,
}

pub fn annuity_split(principal: f64, rate: f64, remaining_years: u32) -> YearSplit {
    let payment = fixed_rate_payment(principal, rate, remaining_years);
    let interest = principal * rate;
    YearSplit {
        interest: Precision::Money.round(interest),
        capital: Precision::Money.round(payment - interest),
    }
}

#[derive(Debug, Clone)]
pub struct MortgageSimulation<'a> {
    condition: &'a MortgageCondition,
    yearly_expenses: f64,
    rate_path: RatePath,
    payments: Vec<MortgagePayment>,
}

impl<'a> MortgageSimulation<'a> {
    pub fn new(inputs: &Inputs, condition: &'a MortgageCondition) -> Result<Self, SimulationError> {
        let rate_path = RatePath::new(inputs.yearly_volatility)?;
        let origination = MortgagePayment {
            year: 0,
            euribor: inputs.current_euribor,
            interest_rate: condition.rate,
            principal: inputs.principal,
            interest_paid: 0.0,
            capital_paid: 0.0,
            bonification: 0.0,
            real_interest_rate: condition.rate,
        };

        let capacity = condition.total_years.min(MAX_TOTAL_YEARS) as usize + 1;
        let mut payments = Vec::with_capacity(capacity);
        payments.push(origination);
        Ok(Self {
            condition,
            yearly_expenses: inputs.yearly_expenses.total(),
            rate_path,
            payments,
        })
    }

    pub fn initial_principal(&self) -> f64 {
        self.payments[0].principal
    }

    pub fn year(&self) -> u32 {
        self.current().year
    }

    pub fn is_complete(&self) -> bool {
        self.year() >= self.condition.total_years
    }

    pub fn payments(&self) -> &[MortgagePayment] {
        &self.payments
    }

    pub fn into_payments(self) -> Vec<MortgagePayment> {
        self.payments
    }

    fn current(&self) -> &MortgagePayment {
        &self.payments[self.payments.len() - 1]
    }

    // Past the term the loan is repaid, so extra calls record zero payments.
    pub fn advance_one_year<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &MortgagePayment {
        let previous = *self.current();
        let euribor = self.rate_path.next_rate(previous.euribor, rng);
        let year = previous.year + 1;

        let (interest_rate, bonification) = if self.condition.is_fixed_year(year) {
            (self.condition.rate, self.condition.fixed_period_bonification)
        } else {
            (
                euribor.max(0.0) + self.condition.euribor_delta,
                self.condition.after_fixed_period_bonification,
            )
        };

        let remaining_years = self.condition.total_years.saturating_sub(year) + 1;
        let split = annuity_split(previous.principal, interest_rate, remaining_years);
        let real_interest_rate = if previous.principal == 0.0 {
            0.0
        } else {
            Precision::Rate.round((split.interest + bonification) / previous.principal)
        };

        self.payments.push(MortgagePayment {
            year,
            euribor,
            interest_rate,
            principal: Precision::Money.round(previous.principal - split.capital),
            interest_paid: split.interest,
            capital_paid: split.capital,
            bonification,
            real_interest_rate,
        });
        self.current()
    }

    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MortgageStats {
        while !self.is_complete() {
            self.advance_one_year(rng);
        }
        self.stats()
    }

    pub fn stats(&self) -> MortgageStats {
        summarize_run(
            &self.payments,
            self.condition,
            self.yearly_expenses,
            &self.condition.name,
        )
    }
}

pub fn run_conditions(
    inputs: &Inputs,
    conditions: &[MortgageCondition],
    config: MonteCarloConfig,
) -> Result<Vec<ConditionResult>, SimulationError> {
    let base_seed = config.seed.unwrap_or_else(rand::random);
    conditions
        .iter()
        .enumerate()
        .map(|(idx, condition)| {
            simulate_condition(inputs, condition, idx as u32, config.runs, base_seed)
        })
        .collect()
}

pub fn run_condition(
    inputs: &Inputs,
    condition: &MortgageCondition,
    config: MonteCarloConfig,
) -> Result<ConditionResult, SimulationError> {
    let base_seed = config.seed.unwrap_or_else(rand::random);
    simulate_condition(inputs, condition, 0, config.runs, base_seed)
}

fn simulate_condition(
    inputs: &Inputs,
    condition: &MortgageCondition,
    condition_index: u32,
    runs: usize,
    base_seed: u64,
) -> Result<ConditionResult, SimulationError> {
    let mut stats = Vec::with_capacity(runs);
    let mut histories = Vec::with_capacity(runs);

    for run_id in 0..runs {
        let mut rng = StdRng::seed_from_u64(derive_seed(base_seed, condition_index, run_id as u32));
        let mut simulation = MortgageSimulation::new(inputs, condition)?;
        stats.push(simulation.simulate(&mut rng));
        histories.push(simulation.into_payments());
    }

    let yearly = summarize_runs(&histories);
    debug!(
        condition = %condition.name,
        runs,
        years = yearly.len(),
        "condition simulated"
    );

    Ok(ConditionResult {
        name: condition.name.clone(),
        stats,
        yearly,
    })
}

fn derive_seed(base_seed: u64, condition_index: u32, run_id: u32) -> u64 {
    let mixed = base_seed ^ ((condition_index as u64) << 32) ^ run_id as u64;
    splitmix64(mixed)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
