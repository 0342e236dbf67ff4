//! Background producer that feeds the record buffer.
//!
//! The stream generates one batch immediately and then one batch per
//! interval tick until its [`StreamHandle`] is stopped.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::buffer::RecordBuffer;
use crate::config::Config;
use crate::generator::CampaignGenerator;

/// Status of the data stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamStatus {
    /// Whether the producer task is running.
    pub is_running: bool,
    /// Batches produced since startup.
    pub batches_produced: u64,
    /// Records produced since startup.
    pub records_produced: u64,
    /// Records per batch.
    pub batch_size: usize,
    /// Seconds between batches.
    pub interval_secs: u64,
}

#[derive(Debug, Default)]
struct Shared {
    stop_signal: AtomicBool,
    running: AtomicBool,
    batches: AtomicU64,
    records: AtomicU64,
    wake: Notify,
}

/// A handle to control a running data stream.
///
/// This is a lightweight, cloneable handle that can be used to stop the
/// stream and read its counters from any task.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    shared: Arc<Shared>,
    batch_size: usize,
    interval: Duration,
}

impl StreamHandle {
    fn new(batch_size: usize, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            batch_size,
            interval,
        }
    }

    /// Signal the stream to stop. The producer exits without waiting for
    /// its next tick.
    pub fn stop(&self) {
        self.shared.stop_signal.store(true, Ordering::SeqCst);
        self.shared.wake.notify_one();
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.shared.stop_signal.load(Ordering::SeqCst)
    }

    /// Check if the producer task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Current status of the stream.
    #[must_use]
    pub fn status(&self) -> StreamStatus {
        StreamStatus {
            is_running: self.is_running(),
            batches_produced: self.shared.batches.load(Ordering::Relaxed),
            records_produced: self.shared.records.load(Ordering::Relaxed),
            batch_size: self.batch_size,
            interval_secs: self.interval.as_secs(),
        }
    }
}

/// The background producer.
#[derive(Debug)]
pub struct DataStream {
    buffer: RecordBuffer,
    generator: CampaignGenerator,
    batch_size: usize,
    interval: Duration,
}

impl DataStream {
    /// Create a stream that appends `batch_size` records to `buffer` every
    /// `interval`.
    #[must_use]
    pub fn new(
        buffer: RecordBuffer,
        generator: CampaignGenerator,
        batch_size: usize,
        interval: Duration,
    ) -> Self {
        Self {
            buffer,
            generator,
            batch_size,
            interval,
        }
    }

    /// Create a stream from the generator section of the configuration.
    #[must_use]
    pub fn from_config(config: &Config, buffer: RecordBuffer) -> Self {
        Self::new(
            buffer,
            CampaignGenerator::new(config.generator.seed),
            config.generator.batch_size,
            config.generator_interval(),
        )
    }

    /// Generate one batch into the buffer, returning the number of records.
    pub fn produce_batch(&mut self) -> usize {
        let batch = self.generator.generate_batch(self.batch_size);
        let count = batch.len();
        self.buffer.extend(batch);
        debug!(
            "Produced {} records (buffer holds {})",
            count,
            self.buffer.len()
        );
        count
    }

    /// Spawn the producer onto the tokio runtime.
    ///
    /// Must be called from within a runtime.
    #[must_use]
    pub fn spawn(self) -> (StreamHandle, JoinHandle<()>) {
        let handle = StreamHandle::new(self.batch_size, self.interval);
        handle.shared.running.store(true, Ordering::SeqCst);
        let task = tokio::spawn(self.run(handle.clone()));
        (handle, task)
    }

    async fn run(mut self, handle: StreamHandle) {
        info!(
            "Data stream started: {} records every {:?}",
            self.batch_size, self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !handle.should_stop() {
            tokio::select! {
                _ = ticker.tick() => {
                    if handle.should_stop() {
                        break;
                    }
                    let count = self.produce_batch();
                    handle.shared.batches.fetch_add(1, Ordering::Relaxed);
                    handle.shared.records.fetch_add(count as u64, Ordering::Relaxed);
                }
                () = handle.shared.wake.notified() => {}
            }
        }

        handle.shared.running.store(false, Ordering::SeqCst);
        info!("Data stream stopped");
    }
}
