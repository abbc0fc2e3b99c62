//! Tick sources.
//!
//! A [`Scheduler`] fires a callback at a fixed period until the returned
//! [`TickHandle`] is cancelled. [`TokioScheduler`] drives real sessions;
//! [`ManualScheduler`] advances a virtual clock on demand for tests and
//! dry runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::SchedulerError;

/// Callback fired on every tick.
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Installs repeating callbacks.
pub trait Scheduler: Send + Sync {
    /// Fire `tick` every `period`, starting one period from now.
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> Box<dyn TickHandle>;
}

/// Cancels a repeating callback. Cancelling twice is a no-op.
pub trait TickHandle: Send {
    fn cancel(&mut self);
}

// ── Tokio ────────────────────────────────────────────────────────────

/// Scheduler backed by a tokio interval task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime the caller is running on.
    pub fn current() -> Result<Self, SchedulerError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut tick: TickFn) -> Box<dyn TickHandle> {
        let task = self.runtime.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                tick();
            }
        });
        Box::new(TokioTickHandle { task: Some(task) })
    }
}

struct TokioTickHandle {
    task: Option<JoinHandle<()>>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── Manual ───────────────────────────────────────────────────────────

/// Deterministic scheduler with a virtual clock.
///
/// Clones share the same clock and task list, so a test can keep one
/// clone while the timer owns another.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    tasks: Vec<ManualTask>,
}

struct ManualTask {
    id: u64,
    period: Duration,
    due: Duration,
    cancelled: Arc<AtomicBool>,
    /// Taken out while the callback runs.
    tick: Option<TickFn>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tick sources that have not been cancelled.
    pub fn active_tasks(&self) -> usize {
        self.lock()
            .tasks
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Move the clock forward by `by`, firing every callback that falls
    /// due, earliest first. Callbacks run without the scheduler lock held.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().now + by;

        loop {
            let (id, mut tick) = {
                let mut inner = self.lock();
                inner.tasks.retain(|t| !t.cancelled.load(Ordering::SeqCst));

                let next = inner
                    .tasks
                    .iter_mut()
                    .filter(|t| t.due <= target && t.tick.is_some())
                    .min_by_key(|t| (t.due, t.id));
                let Some(task) = next else {
                    inner.now = target;
                    return;
                };

                let due = task.due;
                task.due += task.period;
                let id = task.id;
                let Some(tick) = task.tick.take() else {
                    continue;
                };
                inner.now = due;
                (id, tick)
            };

            tick();

            let mut inner = self.lock();
            if let Some(task) = inner.tasks.iter_mut().find(|t| t.id == id) {
                task.tick = Some(tick);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> Box<dyn TickHandle> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now + period;
        inner.tasks.push(ManualTask {
            id,
            period,
            due,
            cancelled: Arc::clone(&cancelled),
            tick: Some(tick),
        });
        Box::new(ManualTickHandle { cancelled })
    }
}

struct ManualTickHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickHandle for ManualTickHandle {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, TickFn) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let tick: TickFn = Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, tick)
    }

    #[test]
    fn manual_fires_once_per_period() {
        let scheduler = ManualScheduler::new();
        let (count, tick) = counter();
        let _handle = scheduler.schedule_repeating(Duration::from_secs(1), tick);

        scheduler.advance(Duration::from_millis(999));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        scheduler.advance_secs(5);
        assert_eq!(count.load(Ordering::SeqCst), 6);
        assert_eq!(scheduler.now(), Duration::from_secs(6));
    }

    #[test]
    fn manual_cancel_stops_firing() {
        let scheduler = ManualScheduler::new();
        let (count, tick) = counter();
        let mut handle = scheduler.schedule_repeating(Duration::from_secs(1), tick);

        scheduler.advance_secs(2);
        handle.cancel();
        handle.cancel();
        scheduler.advance_secs(10);

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_fires_after_each_period() {
        let scheduler = TokioScheduler::current().unwrap();
        let (count, tick) = counter();
        let mut handle = scheduler.schedule_repeating(Duration::from_secs(1), tick);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
