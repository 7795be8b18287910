//! A seam between the simulator's order feeder and its source of
//! randomness, so scenario tests can drive the feeder deterministically
//! instead of depending on real entropy.

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

/// The randomness a feeder needs to synthesize an order.
pub trait Rng: Send {
    fn next_price(&mut self, mid: f64, spread: f64) -> f64;
    fn next_qty(&mut self, min: u32, max: u32) -> u32;
    fn next_bool(&mut self, probability: f64) -> bool;
}

/// Wraps `rand`'s `StdRng`, seeded from the OS or a fixed value.
pub struct RealRng(StdRng);

impl RealRng {
    pub fn from_entropy() -> Self {
        RealRng(StdRng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        RealRng(StdRng::seed_from_u64(seed))
    }
}

impl Rng for RealRng {
    fn next_price(&mut self, mid: f64, spread: f64) -> f64 {
        mid + self.0.gen_range(-spread..=spread)
    }

    fn next_qty(&mut self, min: u32, max: u32) -> u32 {
        self.0.gen_range(min..=max)
    }

    fn next_bool(&mut self, probability: f64) -> bool {
        self.0.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// A scripted `Rng` for deterministic tests: replays fixed values, cycling
/// once exhausted.
pub struct MockRng {
    prices: Vec<f64>,
    qtys: Vec<u32>,
    bools: Vec<bool>,
    price_idx: usize,
    qty_idx: usize,
    bool_idx: usize,
}

impl MockRng {
    pub fn new(prices: Vec<f64>, qtys: Vec<u32>, bools: Vec<bool>) -> Self {
        MockRng {
            prices,
            qtys,
            bools,
            price_idx: 0,
            qty_idx: 0,
            bool_idx: 0,
        }
    }
}

impl Rng for MockRng {
    fn next_price(&mut self, _mid: f64, _spread: f64) -> f64 {
        let v = self.prices[self.price_idx % self.prices.len()];
        self.price_idx += 1;
        v
    }

    fn next_qty(&mut self, _min: u32, _max: u32) -> u32 {
        let v = self.qtys[self.qty_idx % self.qtys.len()];
        self.qty_idx += 1;
        v
    }

    fn next_bool(&mut self, _probability: f64) -> bool {
        let v = self.bools[self.bool_idx % self.bools.len()];
        self.bool_idx += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_rng_cycles_through_scripted_values() {
        let mut rng = MockRng::new(vec![100.0, 101.0], vec![5], vec![true, false]);
        assert_eq!(rng.next_price(0.0, 0.0), 100.0);
        assert_eq!(rng.next_price(0.0, 0.0), 101.0);
        assert_eq!(rng.next_price(0.0, 0.0), 100.0);
        assert_eq!(rng.next_qty(0, 0), 5);
        assert!(rng.next_bool(1.0));
        assert!(!rng.next_bool(1.0));
    }
}
