//! The rate-controlled sampler and its blocking iterator.

use crate::clock::{Clock, SystemClock};
use crate::config::SamplerConfig;
use crate::error::{SamplerError, SamplingError};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp1};
use simulate_dataset::{Dataset, Record};
#[cfg(test)]
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Progress counters for the current generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStats {
    /// Ticks fully completed (selection done and pacing applied).
    pub ticks: u64,
    /// Records handed to the consumer.
    pub records_emitted: u64,
    /// Record count drawn for the latest tick, after clamping.
    ///
    /// Set when the tick opens, so while its records are still being consumed
    /// it describes the tick in progress, which `ticks` does not count yet.
    pub last_tick_count: usize,
    /// Ticks whose draw exceeded the dataset size.
    pub clamped_ticks: u64,
}

/// Mutable per-run state, owned by one sampler.
///
/// The open tick lives here rather than in the iterator or stream, so a
/// consumer that drops either one mid-tick resumes that tick on the next call
/// and the tick is still charged against the budget.
struct SamplerState {
    rng: StdRng,
    remaining: Duration,
    stats: SamplerStats,
    /// Selected positions of the open tick not yet emitted.
    pending: std::vec::IntoIter<usize>,
    /// When the open tick started; `None` between ticks.
    tick_started: Option<Instant>,
    /// Raw draws that replace the exponential sample, consumed in order.
    #[cfg(test)]
    scripted_draws: VecDeque<f64>,
}

impl SamplerState {
    fn new(config: &SamplerConfig) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed.to_u64()),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            remaining: config.duration(),
            stats: SamplerStats::default(),
            pending: Vec::new().into_iter(),
            tick_started: None,
            #[cfg(test)]
            scripted_draws: VecDeque::new(),
        }
    }
}

/// Draws random samples from a dataset at a controlled rate.
///
/// Each tick emits `round(X)` records, where `X` is exponentially distributed
/// with mean `rate`, clamped to the dataset size. The records of one tick are
/// distinct; a record can show up again in a later tick. Ticks are paced to
/// last at least one `interval` and generation stops once `duration` has been
/// used up.
///
/// The random generator and the duration budget belong to this instance
/// alone. The dataset is shared read-only and can back several samplers.
pub struct RateControlledSampler<C = SystemClock> {
    dataset: Arc<Dataset>,
    config: SamplerConfig,
    lambda: f64,
    state: SamplerState,
    clock: C,
}

impl RateControlledSampler<SystemClock> {
    /// Load the CSV file at `path` and build a sampler on top of it.
    pub fn open<P: AsRef<Path>>(path: P, config: SamplerConfig) -> Result<Self, SamplerError> {
        let dataset = Dataset::from_path(path)?;
        Ok(Self::new(Arc::new(dataset), config))
    }

    /// Build a sampler over an already loaded dataset.
    pub fn new(dataset: Arc<Dataset>, config: SamplerConfig) -> Self {
        let lambda = config.lambda();
        let state = SamplerState::new(&config);
        debug!(
            "Sampler created: rate={} interval={:?} duration={:?} seed={:?} lambda={lambda} records={}",
            config.rate(),
            config.interval(),
            config.duration(),
            config.seed(),
            dataset.len()
        );
        Self {
            dataset,
            config,
            lambda,
            state,
            clock: SystemClock,
        }
    }
}

impl<C> RateControlledSampler<C> {
    /// Replace the clock used by [`generate`](Self::generate).
    pub fn with_clock<D: Clock>(self, clock: D) -> RateControlledSampler<D> {
        RateControlledSampler {
            dataset: self.dataset,
            config: self.config,
            lambda: self.lambda,
            state: self.state,
            clock,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Mean time between events in seconds (`interval / rate`).
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Duration budget left for the current generation.
    pub fn remaining(&self) -> Duration {
        self.state.remaining
    }

    pub fn stats(&self) -> SamplerStats {
        self.state.stats
    }

    /// Whether another tick would run.
    pub fn is_exhausted(&self) -> bool {
        self.state.remaining.is_zero()
    }

    /// Start over with a full budget and a freshly seeded generator.
    ///
    /// With a seed, the next generation repeats the previous one exactly.
    pub fn reset(&mut self) {
        self.state = SamplerState::new(&self.config);
    }

    /// Draw the record count for the next tick.
    fn draw_count(&mut self) -> Result<usize, SamplingError> {
        let raw = self.draw_raw().round();
        if !raw.is_finite() {
            return Err(SamplingError::NonFiniteDraw(raw));
        }

        let size = self.dataset.len();
        let count = if raw > size as f64 {
            if self.state.stats.clamped_ticks == 0 {
                warn!("Drew {raw} records for a tick but the dataset only has {size}; clamping");
            }
            self.state.stats.clamped_ticks += 1;
            size
        } else {
            raw as usize
        };

        self.state.stats.last_tick_count = count;
        Ok(count)
    }

    fn draw_raw(&mut self) -> f64 {
        if let Some(raw) = self.scripted_draw() {
            return raw;
        }
        let sample: f64 = Exp1.sample(&mut self.state.rng);
        sample * self.config.rate() as f64
    }

    #[cfg(not(test))]
    fn scripted_draw(&mut self) -> Option<f64> {
        None
    }

    #[cfg(test)]
    fn scripted_draw(&mut self) -> Option<f64> {
        self.state.scripted_draws.pop_front()
    }

    /// Replace the next exponential draws with `draws`, already scaled by rate.
    #[cfg(test)]
    pub(crate) fn script_draws(&mut self, draws: impl IntoIterator<Item = f64>) {
        self.state.scripted_draws.extend(draws);
    }

    /// Emit the next record of the open tick, if any is left.
    pub(crate) fn next_pending(&mut self) -> Option<Record> {
        let index = self.state.pending.next()?;
        self.state.stats.records_emitted += 1;
        Some(self.dataset.records()[index].clone())
    }

    /// Close the open tick at `now`, returning how long to sleep.
    ///
    /// Returns `None` when no tick is open.
    pub(crate) fn close_tick(&mut self, now: Instant) -> Option<Duration> {
        let started = self.state.tick_started.take()?;
        Some(self.finish_tick(now.saturating_duration_since(started)))
    }

    /// Draw and select the records of a new tick starting at `now`.
    ///
    /// A failed draw ends the generation.
    pub(crate) fn open_tick(&mut self, now: Instant) -> Result<(), SamplingError> {
        let count = match self.draw_count() {
            Ok(count) => count,
            Err(e) => {
                self.state.remaining = Duration::ZERO;
                return Err(e);
            }
        };
        self.state.tick_started = Some(now);
        self.state.pending = index::sample(&mut self.state.rng, self.dataset.len(), count)
            .into_vec()
            .into_iter();
        Ok(())
    }

    fn finish_tick(&mut self, elapsed: Duration) -> Duration {
        let interval = self.config.interval();
        let pause = interval.saturating_sub(elapsed);
        self.state.remaining = self.state.remaining.saturating_sub(elapsed.max(interval));
        self.state.stats.ticks += 1;
        debug!(
            "Tick {} emitted {} records in {elapsed:?}, sleeping {pause:?}, {:?} remaining",
            self.state.stats.ticks, self.state.stats.last_tick_count, self.state.remaining
        );
        pause
    }
}

impl<C: Clock> RateControlledSampler<C> {
    /// Lazily generate records until the duration budget runs out.
    ///
    /// The iterator blocks the calling thread between ticks. Dropping it early
    /// leaves the open tick with the sampler; the next `generate` continues
    /// it. Calling `generate` again after the budget is spent yields nothing
    /// until [`reset`](Self::reset).
    pub fn generate(&mut self) -> Generate<'_, C> {
        Generate { sampler: self }
    }
}

/// Blocking iterator returned by [`RateControlledSampler::generate`].
pub struct Generate<'a, C: Clock> {
    sampler: &'a mut RateControlledSampler<C>,
}

impl<C: Clock> Generate<'_, C> {
    pub fn stats(&self) -> SamplerStats {
        self.sampler.stats()
    }
}

impl<C: Clock> Iterator for Generate<'_, C> {
    type Item = Result<Record, SamplerError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.sampler.next_pending() {
                return Some(Ok(record));
            }

            let now = self.sampler.clock.now();
            if let Some(pause) = self.sampler.close_tick(now) {
                if !pause.is_zero() {
                    self.sampler.clock.sleep(pause);
                }
            }

            if self.sampler.is_exhausted() {
                return None;
            }

            let now = self.sampler.clock.now();
            if let Err(e) = self.sampler.open_tick(now) {
                return Some(Err(e.into()));
            }
        }
    }
}
