//! Simulator tuning knobs, with a `Default` sensible enough to run out of
//! the box and a builder for the `lob-sim` CLI to fill in from `clap`.

/// Configuration for a simulator run.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Number of concurrent producer threads feeding the ingress queue.
    pub producer_count: usize,
    /// Capacity of the bounded id-generation domain; producers share one
    /// atomic counter regardless of this setting (see [`crate::simulator::feeder`]).
    pub orders_per_producer: usize,
    /// Starting mid-price new orders are generated around.
    pub mid_price: f64,
    /// Maximum absolute distance from `mid_price` a generated limit price
    /// may fall.
    pub price_spread: f64,
    /// Inclusive bounds on generated order quantity.
    pub min_qty: u32,
    pub max_qty: u32,
    /// Fraction of generated orders that are IOC.
    pub ioc_fraction: f64,
    /// Fraction of generated orders that are FOK.
    pub fok_fraction: f64,
    /// Fraction of generated orders that are market orders.
    pub market_fraction: f64,
    /// Ring capacity given to each listener endpoint registered on the bus.
    pub listener_ring_capacity: usize,
    /// Deterministic seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Whether [`Simulator::start`](super::Simulator::start) should enable
    /// the live-view listener bundle itself, instead of leaving it to an
    /// explicit `enable_live_view(true)` call afterward.
    pub live_view: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            producer_count: 4,
            orders_per_producer: 10_000,
            mid_price: 100.0,
            price_spread: 5.0,
            min_qty: 1,
            max_qty: 100,
            ioc_fraction: 0.1,
            fok_fraction: 0.05,
            market_fraction: 0.05,
            listener_ring_capacity: 4096,
            seed: None,
            live_view: false,
        }
    }
}

impl SimulatorConfig {
    pub fn builder() -> SimulatorConfigBuilder {
        SimulatorConfigBuilder::default()
    }
}

/// Builder for [`SimulatorConfig`], mirroring the spec's convention of
/// exposing every knob as a chainable setter over a `Default`-seeded base.
#[derive(Debug, Clone, Default)]
pub struct SimulatorConfigBuilder {
    config: OptionalConfig,
}

#[derive(Debug, Clone, Default)]
struct OptionalConfig {
    producer_count: Option<usize>,
    orders_per_producer: Option<usize>,
    mid_price: Option<f64>,
    price_spread: Option<f64>,
    min_qty: Option<u32>,
    max_qty: Option<u32>,
    ioc_fraction: Option<f64>,
    fok_fraction: Option<f64>,
    market_fraction: Option<f64>,
    listener_ring_capacity: Option<usize>,
    seed: Option<u64>,
    live_view: Option<bool>,
}

macro_rules! setter {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.config.$name = Some(value);
            self
        }
    };
}

impl SimulatorConfigBuilder {
    setter!(producer_count, usize);
    setter!(orders_per_producer, usize);
    setter!(mid_price, f64);
    setter!(price_spread, f64);
    setter!(min_qty, u32);
    setter!(max_qty, u32);
    setter!(ioc_fraction, f64);
    setter!(fok_fraction, f64);
    setter!(market_fraction, f64);
    setter!(listener_ring_capacity, usize);

    pub fn seed(mut self, value: u64) -> Self {
        self.config.seed = Some(value);
        self
    }

    pub fn live_view(mut self, value: bool) -> Self {
        self.config.live_view = Some(value);
        self
    }

    pub fn build(self) -> SimulatorConfig {
        let default = SimulatorConfig::default();
        let c = self.config;
        SimulatorConfig {
            producer_count: c.producer_count.unwrap_or(default.producer_count),
            orders_per_producer: c.orders_per_producer.unwrap_or(default.orders_per_producer),
            mid_price: c.mid_price.unwrap_or(default.mid_price),
            price_spread: c.price_spread.unwrap_or(default.price_spread),
            min_qty: c.min_qty.unwrap_or(default.min_qty),
            max_qty: c.max_qty.unwrap_or(default.max_qty),
            ioc_fraction: c.ioc_fraction.unwrap_or(default.ioc_fraction),
            fok_fraction: c.fok_fraction.unwrap_or(default.fok_fraction),
            market_fraction: c.market_fraction.unwrap_or(default.market_fraction),
            listener_ring_capacity: c
                .listener_ring_capacity
                .unwrap_or(default.listener_ring_capacity),
            seed: c.seed.or(default.seed),
            live_view: c.live_view.unwrap_or(default.live_view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_only_set_fields() {
        let config = SimulatorConfig::builder().producer_count(8).seed(42).build();
        assert_eq!(config.producer_count, 8);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.mid_price, SimulatorConfig::default().mid_price);
    }

    #[test]
    fn live_view_defaults_to_disabled_and_is_settable() {
        assert!(!SimulatorConfig::default().live_view);
        let config = SimulatorConfig::builder().live_view(true).build();
        assert!(config.live_view);
    }
}
