mod engine;
mod error;
mod presets;
mod rates;
mod solver;
mod summary;
mod types;

pub use engine::{
    ConditionResult, DEFAULT_RUNS, MonteCarloConfig, MortgageSimulation, YearSplit, annuity_split,
    run_condition, run_conditions,
};
pub use error::SimulationError;
pub use presets::{default_conditions, default_inputs};
pub use rates::RatePath;
pub use solver::{SOLVER_TOLERANCE, equivalent_fixed_rate, fixed_rate_payment};
pub use summary::{average_with_percentiles, percentile, summarize_run, summarize_runs};
pub use types::{
    AverageWithPercentiles, Inputs, MAX_TOTAL_YEARS, MortgageCondition, MortgagePayment, MortgageStats,
    PaymentField, Precision, SummarizedMortgagePayment, YearlyExpenses, round_to,
};
