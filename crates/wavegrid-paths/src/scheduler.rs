//! Adaptive pacing of search ticks against a frame-time budget.
//!
//! [`TickScheduler`] runs ticks in batches and hands control back to the
//! host between batches so a render loop is never starved. After every full
//! batch the batch size is recalibrated proportionally:
//!
//! ```text
//! batch_size = max(1, floor(ticks_run * target_ms / max(elapsed_ms, 1)))
//! ```
//!
//! so that each batch converges on the target duration (one 60 Hz frame by
//! default).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::session::{SearchSession, TickEvent};

/// One 60 Hz frame.
pub const DEFAULT_TARGET_BATCH: Duration = Duration::from_nanos(16_666_667);

/// Batch size used before the first recalibration.
pub const DEFAULT_INITIAL_BATCH_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Seams: Tick and Clock
// ---------------------------------------------------------------------------

/// A unit of incremental work the scheduler can drive.
pub trait Tick {
    type Event;

    /// Perform one tick.
    fn tick(&mut self) -> Self::Event;

    /// Whether further ticks would do nothing.
    fn is_finished(&self) -> bool;
}

impl Tick for SearchSession {
    type Event = TickEvent;

    #[inline]
    fn tick(&mut self) -> TickEvent {
        SearchSession::tick(self)
    }

    #[inline]
    fn is_finished(&self) -> bool {
        SearchSession::is_finished(self)
    }
}

/// A monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time since construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

// ---------------------------------------------------------------------------
// PauseHandle
// ---------------------------------------------------------------------------

/// A shareable pause switch checked by the scheduler between batches.
#[derive(Clone, Debug, Default)]
pub struct PauseHandle {
    paused: Arc<AtomicBool>,
}

impl PauseHandle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Config / results
// ---------------------------------------------------------------------------

/// Configuration for a [`TickScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerConfig {
    /// Wall time each batch should take.
    pub target_batch: Duration,
    pub initial_batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_batch: DEFAULT_TARGET_BATCH,
            initial_batch_size: DEFAULT_INITIAL_BATCH_SIZE,
        }
    }
}

impl SchedulerConfig {
    /// A config targeting `fps` batches per second. Non-positive or
    /// non-finite rates fall back to the default target.
    pub fn with_fps(fps: f64) -> Self {
        Self {
            target_batch: Duration::try_from_secs_f64(1.0 / fps).unwrap_or(DEFAULT_TARGET_BATCH),
            ..Self::default()
        }
    }
}

/// The result of one batch.
#[derive(Clone, Debug)]
pub struct Batch<E> {
    /// One event per tick run, in order.
    pub events: Vec<E>,
    pub elapsed: Duration,
    /// The batch size that will be used next.
    pub next_batch_size: usize,
    /// Whether the target finished during this batch.
    pub finished: bool,
}

/// Why [`TickScheduler::run`] returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    /// The pause handle was set; call `run` again to resume.
    Paused,
}

/// Timing statistics accumulated over a run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStats {
    pub ticks: u64,
    /// Time spent inside ticks.
    pub inner: Duration,
    /// Time from the first batch to the end of the last one, host time
    /// included.
    pub outer: Duration,
    /// Times control went back to the host mid-run.
    pub yields: u64,
    pub batch_size: usize,
}

impl RunStats {
    pub fn ticks_per_second(&self) -> f64 {
        self.ticks as f64 * 1000.0 / (self.outer.as_secs_f64() * 1000.0 + 1.0)
    }

    pub fn yields_per_second(&self) -> f64 {
        self.yields as f64 * 1000.0 / (self.outer.as_secs_f64() * 1000.0 + 1.0)
    }

    pub fn ticks_per_yield(&self) -> f64 {
        self.ticks as f64 / (self.yields as f64 + 1.0)
    }
}

// ---------------------------------------------------------------------------
// TickScheduler
// ---------------------------------------------------------------------------

/// Drives a [`Tick`] target in self-tuning batches.
#[derive(Debug)]
pub struct TickScheduler<C: Clock = MonotonicClock> {
    config: SchedulerConfig,
    clock: C,
    batch_size: usize,
    pause: PauseHandle,
    stats: RunStats,
    started: Option<Duration>,
}

impl TickScheduler<MonotonicClock> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> TickScheduler<C> {
    pub fn with_clock(config: SchedulerConfig, clock: C) -> Self {
        let batch_size = config.initial_batch_size.max(1);
        Self {
            config,
            clock,
            batch_size,
            pause: PauseHandle::new(),
            stats: RunStats {
                batch_size,
                ..RunStats::default()
            },
            started: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Ticks the next batch will run.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[inline]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// A handle that pauses this scheduler between batches.
    #[inline]
    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    /// Run a single batch and recalibrate. This is the explicit resume
    /// point for hosts that drive the scheduler from their own frame loop.
    pub fn run_batch<T: Tick>(&mut self, target: &mut T) -> Batch<T::Event> {
        let start = self.clock.now();
        let started = *self.started.get_or_insert_with(|| {
            log::debug!("starting with {} ticks per batch", self.batch_size);
            start
        });

        let mut events = Vec::with_capacity(self.batch_size.min(4096));
        while events.len() < self.batch_size && !target.is_finished() {
            events.push(target.tick());
        }
        let end = self.clock.now();
        let elapsed = end.saturating_sub(start);
        let ran = events.len();

        // A short final batch says nothing about throughput.
        if ran == self.batch_size {
            self.recalibrate(ran, elapsed);
        }
        self.stats.ticks += ran as u64;
        self.stats.inner += elapsed;
        self.stats.outer = end.saturating_sub(started);
        self.stats.batch_size = self.batch_size;

        Batch {
            events,
            elapsed,
            next_batch_size: self.batch_size,
            finished: target.is_finished(),
        }
    }

    /// Run batches until the target finishes or the pause handle is set.
    ///
    /// `host` sees every batch as soon as it completes; returning from it is
    /// the yield point between batches. The pause flag is checked before
    /// each batch, so a host may pause from inside the callback.
    pub fn run<T: Tick>(
        &mut self,
        target: &mut T,
        mut host: impl FnMut(&Batch<T::Event>),
    ) -> RunOutcome {
        loop {
            if self.pause.is_paused() {
                log::debug!("paused after {} ticks", self.stats.ticks);
                return RunOutcome::Paused;
            }
            let batch = self.run_batch(target);
            host(&batch);
            if batch.finished {
                log::debug!("finished with {} ticks per batch", self.batch_size);
                self.report();
                return RunOutcome::Finished;
            }
            self.stats.yields += 1;
        }
    }

    /// Run the target to completion with no budget and no yields, for
    /// throughput measurement. Events are dropped.
    pub fn run_blind<T: Tick>(&mut self, target: &mut T) -> RunStats {
        let start = self.clock.now();
        self.started.get_or_insert(start);
        let mut ran = 0u64;
        while !target.is_finished() {
            target.tick();
            ran += 1;
        }
        let elapsed = self.clock.now().saturating_sub(start);
        self.stats.ticks += ran;
        self.stats.inner += elapsed;
        self.stats.outer += elapsed;
        self.report();
        self.stats
    }

    fn recalibrate(&mut self, ran: usize, elapsed: Duration) {
        let target_ms = self.config.target_batch.as_secs_f64() * 1000.0;
        let elapsed_ms = (elapsed.as_secs_f64() * 1000.0).max(1.0);
        let next = ((ran as f64) * target_ms / elapsed_ms).floor();
        self.batch_size = (next as usize).max(1);
        log::debug!(
            "batch of {ran} took {elapsed_ms:.3}ms, next batch {}",
            self.batch_size
        );
    }

    fn report(&self) {
        let s = &self.stats;
        log::info!(
            "completed {} ticks in {}ms (inner), {}ms (outer) ({:.0} ticks/s)",
            s.ticks,
            s.inner.as_millis(),
            s.outer.as_millis(),
            s.ticks_per_second()
        );
        log::info!(
            "{:.0} yields/s, {:.0} ticks/yield",
            s.yields_per_second(),
            s.ticks_per_yield()
        );
    }
}
