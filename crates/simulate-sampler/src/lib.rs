//! Rate-controlled synthetic event sampler.
//!
//! [`RateControlledSampler`] repeatedly draws random samples from a fixed
//! [`Dataset`] and emits them as a lazy, time-bounded sequence of records.
//! Every `interval` is one tick: the number of records emitted in a tick is an
//! exponential draw (rounded to the nearest integer) whose mean is `rate`, and
//! the records of a tick are picked without replacement. The sampler sleeps
//! out the rest of each tick and stops once `duration` has been used up.
//!
//! # Architecture
//!
//! ```text
//!   CSV file ──► Dataset (Arc, read-only)
//!                    │
//!                    ▼
//! ┌──────────────────────────────────┐
//! │      RateControlledSampler       │
//! │                                  │
//! │  - config (rate/interval/...)    │
//! │  - rng (StdRng, seeded)          │
//! │  - remaining duration budget     │
//! │  - clock                         │
//! └───────┬──────────────────┬───────┘
//!         │ generate()       │ stream()
//!         ▼                  ▼
//!   Iterator<Record>   Stream<Record>
//!   (blocking sleep)   (tokio sleep)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use simulate_dataset::Dataset;
//! use simulate_sampler::{ManualClock, RateControlledSampler, SamplerConfig};
//!
//! let dataset = Dataset::from_reader("word\nalpha\nbeta\ngamma\n".as_bytes(), "inline").unwrap();
//! let config = SamplerConfig::new(2, Duration::from_secs(1), Duration::from_secs(3))
//!     .unwrap()
//!     .with_seed(42u64);
//!
//! let mut sampler = RateControlledSampler::new(Arc::new(dataset), config)
//!     .with_clock(ManualClock::new());
//!
//! for record in sampler.generate() {
//!     println!("{:?}", record.unwrap().get("word"));
//! }
//! assert_eq!(sampler.stats().ticks, 3);
//! ```

mod clock;
mod config;
mod error;
mod sampler;
mod seed;
mod stream;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{validate_duration, validate_interval, validate_rate, SamplerConfig};
pub use error::{ConfigError, SamplerError, SamplingError};
pub use sampler::{Generate, RateControlledSampler, SamplerStats};
pub use seed::Seed;

pub use simulate_dataset::{DataSourceError, Dataset, Record};
