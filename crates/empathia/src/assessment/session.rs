use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

/// A newer run started while this one was waiting out its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("assessment run {generation} superseded by run {latest}")]
pub struct Superseded {
    pub generation: u64,
    pub latest: u64,
}

/// Runs simulated assessments behind a fixed delay; only the latest run completes.
#[derive(Debug)]
pub struct AssessmentRunner {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl AssessmentRunner {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Generation of the most recently started run (0 before any run).
    pub fn latest(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Invalidates whatever run is pending without starting a new one.
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Claims the next generation immediately, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            generation,
            delay: self.delay,
            latest: Arc::clone(&self.generation),
        }
    }

    /// `begin()` followed by [`Ticket::run`]; the generation is claimed at call time.
    pub fn run<T, F>(&self, compute: F) -> impl Future<Output = Result<T, Superseded>>
    where
        F: FnOnce() -> T,
    {
        self.begin().run(compute)
    }
}

/// A claimed run generation, movable into a spawned task.
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits out the delay, then evaluates `compute` if no newer ticket was issued.
    pub async fn run<T, F>(self, compute: F) -> Result<T, Superseded>
    where
        F: FnOnce() -> T,
    {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let generation = self.generation;
        let latest = self.latest.load(Ordering::Acquire);
        if latest != generation {
            debug!(generation, latest, "dropping superseded assessment run");
            return Err(Superseded { generation, latest });
        }

        Ok(compute())
    }
}

/// The profile the user currently has selected, passed explicitly to handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    pub fn select(&mut self, refugee_code: impl Into<String>) {
        self.current = Some(refugee_code.into());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
