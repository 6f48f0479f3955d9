//! Async form of the generation loop, paced with tokio timers.

use crate::error::SamplerError;
use crate::sampler::RateControlledSampler;
use futures::stream::{self, Stream};
use simulate_dataset::Record;
use tokio::time::Instant;

impl<C> RateControlledSampler<C> {
    /// Same sequence as [`generate`](Self::generate), as an async stream.
    ///
    /// Pacing uses `tokio::time`, so waiting between ticks yields to the
    /// runtime instead of blocking a worker thread. The sampler's own clock is
    /// not consulted. A stream dropped mid-tick leaves the open tick with the
    /// sampler, like the iterator does.
    pub fn stream(&mut self) -> impl Stream<Item = Result<Record, SamplerError>> + '_ {
        stream::unfold(self, |sampler| async move {
            loop {
                if let Some(record) = sampler.next_pending() {
                    return Some((Ok(record), sampler));
                }

                if let Some(pause) = sampler.close_tick(Instant::now().into_std()) {
                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }

                if sampler.is_exhausted() {
                    return None;
                }

                if let Err(e) = sampler.open_tick(Instant::now().into_std()) {
                    return Some((Err(e.into()), sampler));
                }
            }
        })
    }
}
