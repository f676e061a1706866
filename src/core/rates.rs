use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::error::SimulationError;
use super::types::Precision;

/// Yearly random walk of the market rate. Negative values are not floored.
#[derive(Debug, Clone, Copy)]
pub struct RatePath {
    noise: Normal<f64>,
}

impl RatePath {
    pub fn new(yearly_volatility: f64) -> Result<Self, SimulationError> {
        let noise = Normal::new(0.0, yearly_volatility).map_err(|e| {
            SimulationError::invalid_input("yearlyVariance", &e.to_string())
        })?;
        Ok(Self { noise })
    }

    pub fn next_rate<R: Rng + ?Sized>(&self, previous_rate: f64, rng: &mut R) -> f64 {
        Precision::Rate.round(previous_rate + self.noise.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn draws_stay_close_to_previous_rate() {
        let path = RatePath::new(0.0003).expect("valid volatility");
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let next = path.next_rate(0.01, &mut rng);
            assert!((next - 0.01).abs() < 0.01, "draw {next} too far from 0.01");
        }
    }

    #[test]
    fn draws_are_rounded_to_rate_precision() {
        let path = RatePath::new(0.003).expect("valid volatility");
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let next = path.next_rate(0.007, &mut rng);
            assert_eq!(next, Precision::Rate.round(next));
        }
    }

    #[test]
    fn same_seed_reproduces_the_path() {
        let path = RatePath::new(0.003).expect("valid volatility");
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let mut rate_a = 0.007;
        let mut rate_b = 0.007;
        for _ in 0..30 {
            rate_a = path.next_rate(rate_a, &mut a);
            rate_b = path.next_rate(rate_b, &mut b);
        }
        assert_eq!(rate_a, rate_b);
    }

    #[test]
    fn negative_rates_are_not_floored() {
        let path = RatePath::new(0.01).expect("valid volatility");
        let mut rng = StdRng::seed_from_u64(5);
        let mut rate = 0.0;
        let mut saw_negative = false;
        for _ in 0..200 {
            rate = path.next_rate(rate, &mut rng);
            saw_negative |= rate < 0.0;
        }
        assert!(saw_negative);
    }

    #[test]
    fn rejects_invalid_volatility() {
        assert!(RatePath::new(f64::NAN).is_err());
        assert!(RatePath::new(-1.0).is_err());
    }
}
