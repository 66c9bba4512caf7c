//! Progress tracking shared between the worker and the calling thread.
//!
//! The engine reports percentages per phase from the worker thread. They are
//! folded into two monotonic counters that the calling thread polls and
//! forwards to a [`ProgressMonitor`], usually a host progress bar.

use crate::message::{PackingPhase, ProgressReport};
use std::sync::atomic::{AtomicU32, Ordering};

/// Upper bound of every progress counter.
pub const PROGRESS_DONE: u32 = 100;

/// Monotonic per-phase progress counters.
///
/// Both counters only move forward: a report lower than the current value
/// is ignored.
#[derive(Debug, Default)]
pub struct PhaseProgress {
    topology: AtomicU32,
    packing: AtomicU32,
}

impl PhaseProgress {
    /// Creates counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a progress report into the counters.
    ///
    /// Packing and pixel margin adjustment both drive the packing counter.
    /// Other phases are ignored.
    pub fn record(&self, report: &ProgressReport) {
        let counter = match report.phase {
            PackingPhase::TopologyAnalysis => &self.topology,
            PackingPhase::Packing | PackingPhase::PixelMarginAdjustment => &self.packing,
            PackingPhase::Other(_) => return,
        };

        for &percent in &report.progress {
            counter.fetch_max(percent.min(PROGRESS_DONE), Ordering::AcqRel);
        }
    }

    /// Progress of the topology analysis phase.
    pub fn topology(&self) -> u32 {
        self.topology.load(Ordering::Acquire)
    }

    /// Progress of the packing phase.
    pub fn packing(&self) -> u32 {
        self.packing.load(Ordering::Acquire)
    }

    /// Forces both counters to done.
    pub fn complete(&self) {
        self.topology.store(PROGRESS_DONE, Ordering::Release);
        self.packing.store(PROGRESS_DONE, Ordering::Release);
    }

    /// Returns true once both counters are done.
    pub fn is_complete(&self) -> bool {
        self.topology() >= PROGRESS_DONE && self.packing() >= PROGRESS_DONE
    }
}

/// A progress indicator driven by the calling thread.
pub trait ProgressMonitor {
    /// Starts the indicator with the given number of total steps.
    fn begin(&mut self, total: u32);

    /// Advances the indicator. Returns true if the user asked to abort.
    fn step(&mut self, delta: u32) -> bool;

    /// Releases the indicator.
    fn end(&mut self);
}

/// A monitor that discards every update and never aborts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMonitor;

impl ProgressMonitor for NullMonitor {
    fn begin(&mut self, _total: u32) {}

    fn step(&mut self, _delta: u32) -> bool {
        false
    }

    fn end(&mut self) {}
}

/// Keeps a monitor open for the lifetime of the scope.
///
/// Calls [`ProgressMonitor::begin`] on creation and
/// [`ProgressMonitor::end`] on drop, also on early return.
pub struct MonitorScope<'a, M: ProgressMonitor + ?Sized> {
    monitor: &'a mut M,
}

impl<'a, M: ProgressMonitor + ?Sized> MonitorScope<'a, M> {
    /// Begins the monitor with `total` steps.
    pub fn new(monitor: &'a mut M, total: u32) -> Self {
        monitor.begin(total);
        Self { monitor }
    }

    /// Advances the monitor. Returns true if the user asked to abort.
    pub fn step(&mut self, delta: u32) -> bool {
        self.monitor.step(delta)
    }
}

impl<M: ProgressMonitor + ?Sized> Drop for MonitorScope<'_, M> {
    fn drop(&mut self) {
        self.monitor.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn test_packing_never_decreases() {
        let progress = PhaseProgress::new();
        progress.record(&ProgressReport::new(PackingPhase::Packing, 40));
        progress.record(&ProgressReport::new(PackingPhase::Packing, 15));
        assert_eq!(progress.packing(), 40);
        assert_eq!(progress.topology(), 0);
    }

    #[test]
    fn test_pixel_margin_drives_packing() {
        let progress = PhaseProgress::new();
        progress.record(&ProgressReport::new(PackingPhase::PixelMarginAdjustment, 70));
        progress.record(&ProgressReport::new(PackingPhase::Other(9), 99));
        assert_eq!(progress.packing(), 70);
        assert_eq!(progress.topology(), 0);
    }

    #[test]
    fn test_values_clamped_to_done() {
        let progress = PhaseProgress::new();
        progress.record(&ProgressReport {
            phase: PackingPhase::TopologyAnalysis,
            progress: vec![20, 250, 30],
        });
        assert_eq!(progress.topology(), PROGRESS_DONE);
    }

    #[test]
    fn test_random_stream_is_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        let progress = PhaseProgress::new();
        let mut last = (0, 0);

        for _ in 0..1000 {
            let phase = if rng.gen_bool(0.5) {
                PackingPhase::TopologyAnalysis
            } else {
                PackingPhase::Packing
            };
            progress.record(&ProgressReport::new(phase, rng.gen_range(0..=100)));

            let now = (progress.topology(), progress.packing());
            assert!(now.0 >= last.0, "topology went from {} to {}", last.0, now.0);
            assert!(now.1 >= last.1, "packing went from {} to {}", last.1, now.1);
            last = now;
        }
    }

    #[test]
    fn test_complete() {
        let progress = PhaseProgress::new();
        progress.record(&ProgressReport::new(PackingPhase::Packing, 12));
        assert!(!progress.is_complete());
        progress.complete();
        assert!(progress.is_complete());
    }

    #[derive(Default)]
    struct CountingMonitor {
        begun: u32,
        ended: u32,
    }

    impl ProgressMonitor for CountingMonitor {
        fn begin(&mut self, total: u32) {
            self.begun = total;
        }

        fn step(&mut self, _delta: u32) -> bool {
            false
        }

        fn end(&mut self) {
            self.ended += 1;
        }
    }

    #[test]
    fn test_scope_ends_monitor_once() {
        let mut monitor = CountingMonitor::default();
        {
            let mut scope = MonitorScope::new(&mut monitor, PROGRESS_DONE);
            assert!(!scope.step(5));
        }
        assert_eq!(monitor.begun, PROGRESS_DONE);
        assert_eq!(monitor.ended, 1);
    }
}
