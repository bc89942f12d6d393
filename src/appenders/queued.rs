//! Queued appender
//!
//! Moves an appender onto a dedicated worker thread fed by a bounded
//! channel, so slow sinks do not hold up `Logger::log` callers. When the
//! queue is full the [`OverflowPolicy`] decides what happens; messages of
//! critical priority (Emergency, Alert, Critical, Error) always wait for
//! space and are never dropped.
//!
//! Shutdown drains the queue within the configured timeout. Past it, the
//! worker discards whatever is still queued, finishes the call in progress
//! and shuts the inner appender down; `shutdown` waits for that and then
//! reports [`LoggerError::ShutdownTimeout`]. Nothing reaches the inner
//! appender once `shutdown` has returned.

use crate::core::logger::isolate;
use crate::core::{
    Appender, LogMessage, LogPriority, LoggerError, LoggerMetrics, OverflowCallback,
    OverflowPolicy, Result, DEFAULT_SHUTDOWN_TIMEOUT,
};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const BATCH_SIZE: usize = 50;

enum Command {
    Append(LogMessage),
    Flush(Sender<Result<()>>),
}

/// Appender wrapper that hands messages to a worker thread
///
/// # Example
///
/// ```
/// use severity_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let handle = memory.handle();
///
/// let logger = Logger::new();
/// logger
///     .set_appender("memory", QueuedAppender::new(memory, 128))
///     .unwrap();
/// logger.info("handled on the worker thread").unwrap();
///
/// // Shutdown drains the queue before the inner appender is closed
/// logger.shutdown().unwrap();
/// assert_eq!(handle.len(), 1);
/// ```
pub struct QueuedAppender {
    kind: String,
    sender: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<Result<()>>>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    metrics: Arc<LoggerMetrics>,
    shutdown_timeout: Duration,
    /// Set when the drain timed out; the worker discards the rest of the queue
    abandon: Arc<AtomicBool>,
}

impl QueuedAppender {
    /// Wrap `inner` behind a queue holding at most `capacity` messages
    pub fn new<A: Appender + 'static>(inner: A, capacity: usize) -> Self {
        let kind = format!("queued {}", inner.kind());
        let (sender, receiver) = bounded(capacity.max(1));
        let metrics = Arc::new(LoggerMetrics::new());
        let worker_metrics = Arc::clone(&metrics);
        let abandon = Arc::new(AtomicBool::new(false));
        let worker_abandon = Arc::clone(&abandon);

        let worker = thread::Builder::new()
            .name("severity-logger-queue".to_string())
            .spawn(move || run_worker(Box::new(inner), receiver, worker_metrics, worker_abandon));

        let (sender, worker) = match worker {
            Ok(handle) => (Some(sender), Some(handle)),
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to spawn queue worker: {}", e);
                (None, None)
            }
        };

        Self {
            kind,
            sender,
            worker,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
            metrics,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            abandon,
        }
    }

    #[must_use]
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Called with the total dropped count on the first drop and every 1000th after
    #[must_use]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// How long `shutdown` waits for the worker to drain
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Shared counters; stays valid after the appender moves into a logger
    pub fn metrics(&self) -> Arc<LoggerMetrics> {
        Arc::clone(&self.metrics)
    }

    fn sender(&self) -> Result<&Sender<Command>> {
        self.sender.as_ref().ok_or(LoggerError::LoggerClosed)
    }

    fn send_blocking(&self, command: Command) -> Result<()> {
        self.sender()?
            .send(command)
            .map_err(|_| LoggerError::ChannelSendError)
    }

    fn handle_overflow(&self, command: Command, priority: LogPriority) -> Result<()> {
        self.metrics.record_queue_full();

        if priority == LogPriority::Critical {
            self.metrics.record_critical_preserved();
            return self.send_blocking(command);
        }

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_queue_dropped();
                Ok(())
            }
            OverflowPolicy::Block => {
                self.metrics.record_block();
                self.send_blocking(command)
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match self.sender()?.send_timeout(command, *timeout) {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(_)) => {
                        self.alert_and_drop();
                        Ok(())
                    }
                    Err(SendTimeoutError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
                }
            }
            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                Ok(())
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped = self.metrics.record_queue_dropped() + 1;

        // Alert on first drop and periodically thereafter
        if dropped == 1 || dropped % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Queue for {} full, {} messages dropped. \
                 Consider increasing capacity or using a different overflow policy.",
                self.kind, dropped
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped);
            }
        }
    }

    fn join_worker(&mut self) -> Result<()> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };

        let start = Instant::now();
        let mut timed_out = false;
        while !handle.is_finished() {
            if start.elapsed() >= self.shutdown_timeout {
                eprintln!(
                    "[LOGGER WARNING] Queue worker for {} did not finish within {:?}. \
                     Discarding the remaining queued messages.",
                    self.kind, self.shutdown_timeout
                );
                self.abandon.store(true, Ordering::Release);
                timed_out = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        // The worker stops after its current call; wait for it either way
        let joined = match handle.join() {
            Ok(result) => result,
            Err(_) => Err(LoggerError::AppenderPanicked(format!(
                "queue worker for {} panicked",
                self.kind
            ))),
        };

        if timed_out {
            return Err(LoggerError::ShutdownTimeout {
                timeout_ms: self.shutdown_timeout.as_millis() as u64,
            });
        }
        joined
    }
}

impl Appender for QueuedAppender {
    fn append(&mut self, message: &LogMessage) -> Result<()> {
        let command = Command::Append(message.clone());

        match self.sender()?.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(command)) => {
                self.handle_overflow(command, message.level().priority())
            }
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
        }
    }

    /// Wait until the worker has written everything queued so far
    fn flush(&mut self) -> Result<()> {
        let (ack_sender, ack_receiver) = bounded(1);
        self.send_blocking(Command::Flush(ack_sender))?;
        ack_receiver
            .recv()
            .map_err(|_| LoggerError::ChannelSendError)?
    }

    /// Close the queue, drain it, then shut the inner appender down
    fn shutdown(&mut self) -> Result<()> {
        drop(self.sender.take());
        self.join_worker()
    }

    fn kind(&self) -> &str {
        &self.kind
    }
}

impl Drop for QueuedAppender {
    fn drop(&mut self) {
        if self.worker.is_some() {
            if let Err(e) = self.shutdown() {
                eprintln!("[LOGGER ERROR] Queue shutdown for {} failed: {}", self.kind, e);
            }
        }
    }
}

fn discard(command: Command, metrics: &LoggerMetrics) {
    if let Command::Append(_) = command {
        metrics.record_queue_dropped();
    }
}

fn run_worker(
    mut inner: Box<dyn Appender>,
    receiver: Receiver<Command>,
    metrics: Arc<LoggerMetrics>,
    abandon: Arc<AtomicBool>,
) -> Result<()> {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    while let Ok(command) = receiver.recv() {
        if abandon.load(Ordering::Acquire) {
            discard(command, &metrics);
            receiver
                .try_iter()
                .for_each(|command| discard(command, &metrics));
            break;
        }

        batch.push(command);
        while batch.len() < BATCH_SIZE {
            match receiver.try_recv() {
                Ok(command) => batch.push(command),
                Err(_) => break,
            }
        }

        for command in batch.drain(..) {
            if abandon.load(Ordering::Acquire) {
                discard(command, &metrics);
                continue;
            }

            match command {
                Command::Append(message) => match isolate(|| inner.append(&message)) {
                    Ok(()) => {
                        metrics.record_delivered();
                    }
                    Err(e) => {
                        eprintln!("[LOGGER ERROR] Queued {} failed: {}", inner.kind(), e);
                        metrics.record_appender_failure();
                    }
                },
                Command::Flush(ack) => {
                    let _ = ack.send(isolate(|| inner.flush()));
                }
            }
        }

        if let Err(e) = isolate(|| inner.flush()) {
            eprintln!("[LOGGER ERROR] Queued {} flush failed: {}", inner.kind(), e);
        }
    }

    // Channel closed and drained, or abandoned
    isolate(|| inner.shutdown())
}
