//! Periodic tick sources.
//!
//! A session host owns exactly one tick source and turns it on and off as
//! the countdown starts and stops. After `cancel()` returns, no tick from
//! the cancelled activation is ever delivered.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

pub trait TickSource: Send {
    /// Begin delivering ticks. No-op while already active.
    fn activate(&mut self);

    /// Stop delivering ticks and discard any that are pending.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Tokio interval feeding ticks through a channel.
///
/// Every activation gets a new generation number; ticks carrying an older
/// generation are dropped on receipt, so a task that is still winding down
/// after `abort()` cannot leak a tick into the next countdown.
///
/// `activate()` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<u64>,
    rx: mpsc::UnboundedReceiver<u64>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            period,
            generation: 0,
            handle: None,
            tx,
            rx,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Wait for the next tick of the current activation.
    ///
    /// Never resolves while the ticker is inactive.
    pub async fn next_tick(&mut self) {
        loop {
            if self.handle.is_none() {
                std::future::pending::<()>().await;
            }
            match self.rx.recv().await {
                Some(generation) if generation == self.generation => return,
                Some(_) => continue,
                None => std::future::pending::<()>().await,
            }
        }
    }

    fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

impl TickSource for IntervalTicker {
    fn activate(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.drain();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();

        tracing::debug!(generation, ?period, "tick source activated");

        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(generation).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "tick source cancelled");
        }
        self.drain();
    }

    fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Tick source that never fires on its own; the caller ticks the timer
/// directly. Records how it was driven.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: bool,
    activations: u32,
    cancellations: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activations(&self) -> u32 {
        self.activations
    }

    pub fn cancellations(&self) -> u32 {
        self.cancellations
    }
}

impl TickSource for ManualTicker {
    fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.activations += 1;
        }
    }

    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.cancellations += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
