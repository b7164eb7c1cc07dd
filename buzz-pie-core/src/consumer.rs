use crate::payload::Record;
use crate::source::RecordSource;
use buzz_pie_common::{BuzzPieError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Give up on a source that fails this many pulls in a row.
const MAX_CONSECUTIVE_ERRORS: u32 = 16;

#[derive(Debug)]
pub enum SourceEvent {
    Record(Record),
    Error(String),
    Closed,
}

/// Consumer thread feeding a bounded channel.
///
/// A full channel blocks the consumer thread until the reader catches up, so
/// slow rendering throttles consumption and nothing is dropped.
pub struct ConsumerHandle {
    rx: Option<Receiver<SourceEvent>>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    source_name: String,
}

pub fn spawn_consumer(mut source: Box<dyn RecordSource>, capacity: usize) -> Result<ConsumerHandle> {
    let (tx, rx) = sync_channel(capacity.max(1));
    let stop = Arc::new(AtomicBool::new(false));
    let source_name = source.describe();
    let thread_stop = Arc::clone(&stop);
    let thread = std::thread::Builder::new()
        .name("buzz-pie-consumer".into())
        .spawn(move || pump(source.as_mut(), &tx, &thread_stop))
        .map_err(|e| BuzzPieError::Queue(format!("failed to spawn consumer thread: {e}")))?;
    Ok(ConsumerHandle {
        rx: Some(rx),
        stop,
        thread: Some(thread),
        source_name,
    })
}

fn pump(source: &mut dyn RecordSource, tx: &SyncSender<SourceEvent>, stop: &AtomicBool) {
    let name = source.describe();
    info!("Polling messages from {name}...");
    let mut consecutive_errors = 0u32;
    while !stop.load(Ordering::Relaxed) {
        match source.next_record(stop) {
            Ok(Some(record)) => {
                consecutive_errors = 0;
                debug!(offset = record.offset, "Received: {}", record.preview(200));
                if tx.send(SourceEvent::Record(record)).is_err() {
                    break; // reader gone
                }
            }
            Ok(None) => break,
            Err(e) => {
                consecutive_errors += 1;
                error!("Error while consuming from {name}: {e}");
                if tx.send(SourceEvent::Error(e.to_string())).is_err() {
                    break;
                }
                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    error!("Giving up on {name} after {consecutive_errors} consecutive errors");
                    break;
                }
            }
        }
    }
    // close is best effort
    if let Err(e) = source.close() {
        warn!("Failed to close {name}: {e}");
    }
    info!("Consumer for {name} closed.");
    let _ = tx.send(SourceEvent::Closed);
}

impl ConsumerHandle {
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Shared flag; raising it asks the consumer thread to wind down.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.rx.is_some()
    }

    /// Everything currently queued, up to `max` events.
    pub fn drain(&self, max: usize) -> Vec<SourceEvent> {
        let mut out = Vec::new();
        let Some(rx) = &self.rx else { return out };
        while out.len() < max {
            match rx.try_recv() {
                Ok(ev) => out.push(ev),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    out.push(SourceEvent::Closed);
                    break;
                }
            }
        }
        out
    }

    /// Wait up to `timeout` for one event. `None` on timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SourceEvent> {
        let rx = self.rx.as_ref()?;
        match rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(SourceEvent::Closed),
        }
    }

    /// Raise the stop flag and drop the receiving end. Joins the thread if it
    /// has already exited; a thread still blocked in a read is left detached.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.rx = None;
        if let Some(thread) = self.thread.take() {
            if thread.is_finished() {
                if thread.join().is_err() {
                    warn!("Consumer thread for {} panicked", self.source_name);
                }
            } else {
                debug!("Consumer thread for {} still blocked; detaching", self.source_name);
            }
        }
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
