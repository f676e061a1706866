use serde::{Deserialize, Serialize};

use super::error::SimulationError;

pub const MAX_TOTAL_YEARS: u32 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Precision {
    Rate,
    Money,
}

impl Precision {
    pub const fn decimals(self) -> i32 {
        match self {
            Precision::Rate => 5,
            Precision::Money => 2,
        }
    }

    pub fn round(self, value: f64) -> f64 {
        round_to(value, self.decimals())
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageCondition {
    pub name: String,
    pub rate: f64,
    pub fixed_period: u32,
    pub euribor_delta: f64,
    pub total_years: u32,
    pub fixed_period_bonification: f64,
    pub after_fixed_period_bonification: f64,
}

impl MortgageCondition {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |reason: &str| SimulationError::InvalidCondition {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.total_years == 0 || self.total_years > MAX_TOTAL_YEARS {
            return Err(invalid(&format!(
                "totalYears must be between 1 and {MAX_TOTAL_YEARS}"
            )));
        }
        if self.fixed_period > self.total_years {
            return Err(invalid("fixedPeriod must be <= totalYears"));
        }
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(invalid("rate must be a finite value >= 0"));
        }
        if !self.euribor_delta.is_finite() {
            return Err(invalid("euriborDelta must be finite"));
        }
        if !self.fixed_period_bonification.is_finite()
            || !self.after_fixed_period_bonification.is_finite()
        {
            return Err(invalid("bonifications must be finite"));
        }
        Ok(())
    }

    pub fn is_fixed_year(&self, year: u32) -> bool {
        year <= self.fixed_period
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearlyExpenses {
    items: Vec<(String, f64)>,
}

impl YearlyExpenses {
    pub fn single(amount: f64) -> Self {
        Self {
            items: vec![("yearly_house_expenses".to_string(), amount)],
        }
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            items: items
                .into_iter()
                .map(|(name, amount)| (name.into(), amount))
                .collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|(_, amount)| amount).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Inputs {
    pub principal: f64,
    pub current_euribor: f64,
    pub yearly_volatility: f64,
    pub yearly_expenses: YearlyExpenses,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgagePayment {
    pub year: u32,
    pub euribor: f64,
    pub interest_rate: f64,
    pub principal: f64,
    pub interest_paid: f64,
    pub capital_paid: f64,
    #[serde(rename = "bonfication_payments")]
    pub bonification: f64,
    pub real_interest_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageStats {
    pub average_euribor: f64,
    pub average_interest_rate: f64,
    pub equivalent_fixed_interest_rate: f64,
    pub total_interest_paid: f64,
    pub total_capital_paid: f64,
    pub total_expenses: f64,
    pub total_bonification_payments: f64,
    pub total_paid: f64,
    pub total_paid_without_expenses: f64,
    pub average_monthly_payment: f64,
    pub total_years: u32,
    #[serde(rename = "type")]
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageWithPercentiles {
    pub average: f64,
    pub percentile_10: f64,
    pub percentile_20: f64,
    pub percentile_30: f64,
    pub percentile_40: f64,
    pub percentile_50: f64,
    pub percentile_60: f64,
    pub percentile_70: f64,
    pub percentile_80: f64,
    pub percentile_90: f64,
}

impl AverageWithPercentiles {
    pub fn deciles(&self) -> [f64; 9] {
        [
            self.percentile_10,
            self.percentile_20,
            self.percentile_30,
            self.percentile_40,
            self.percentile_50,
            self.percentile_60,
            self.percentile_70,
            self.percentile_80,
            self.percentile_90,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizedMortgagePayment {
    pub year: u32,
    pub euribor: AverageWithPercentiles,
    pub interest_rate: AverageWithPercentiles,
    pub principal: AverageWithPercentiles,
    pub interest_paid: AverageWithPercentiles,
    pub capital_paid: AverageWithPercentiles,
    #[serde(rename = "bonfication_payments")]
    pub bonification: AverageWithPercentiles,
    pub real_interest_rate: AverageWithPercentiles,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PaymentField {
    Euribor,
    InterestRate,
    Principal,
    InterestPaid,
    CapitalPaid,
    Bonification,
    RealInterestRate,
}

impl PaymentField {
    pub const ALL: [PaymentField; 7] = [
        PaymentField::Euribor,
        PaymentField::InterestRate,
        PaymentField::Principal,
        PaymentField::InterestPaid,
        PaymentField::CapitalPaid,
        PaymentField::Bonification,
        PaymentField::RealInterestRate,
    ];

    pub const fn precision(self) -> Precision {
        match self {
            PaymentField::Euribor | PaymentField::InterestRate | PaymentField::RealInterestRate => {
                Precision::Rate
            }
            PaymentField::Principal
            | PaymentField::InterestPaid
            | PaymentField::CapitalPaid
            | PaymentField::Bonification => Precision::Money,
        }
    }

    pub fn value(self, payment: &MortgagePayment) -> f64 {
        match self {
            PaymentField::Euribor => payment.euribor,
            PaymentField::InterestRate => payment.interest_rate,
            PaymentField::Principal => payment.principal,
            PaymentField::InterestPaid => payment.interest_paid,
            PaymentField::CapitalPaid => payment.capital_paid,
            PaymentField::Bonification => payment.bonification,
            PaymentField::RealInterestRate => payment.real_interest_rate,
        }
    }
}
