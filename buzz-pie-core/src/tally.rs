use crate::category::category_key;
use crate::chart::PieChart;
use crate::consumer::{ConsumerHandle, SourceEvent};
use crate::frequency::FrequencyTable;
use crate::payload::{decode_payload, DecodeError, Record};
use buzz_pie_common::ChartConfig;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum Outcome {
    Counted { key: String, count: u64 },
    Dropped(DecodeError),
}

/// Owns the frequency table and applies one record at a time.
pub struct Tally {
    field: String,
    min_share: f64,
    start_angle_deg: f64,
    table: FrequencyTable,
    processed: u64,
    dropped: u64,
    last_error: Option<String>,
}

impl Tally {
    pub fn new(chart: &ChartConfig) -> Self {
        info!("Grouping by field: {}", chart.category_field);
        Self {
            field: chart.category_field.clone(),
            min_share: chart.min_share,
            start_angle_deg: chart.start_angle_deg,
            table: FrequencyTable::new(),
            processed: 0,
            dropped: 0,
            last_error: None,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Records seen, counted or not.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Decode, extract and count one record. Bad payloads are logged and
    /// dropped; the table is left untouched for them.
    pub fn process(&mut self, record: Record) -> Outcome {
        self.processed += 1;
        let offset = record.offset;
        debug!(offset, "Raw message: {}", record.preview(200));
        let event = match decode_payload(record.payload) {
            Ok(ev) => ev,
            Err(e) => {
                error!(offset, "Dropping message: {e}");
                self.dropped += 1;
                self.last_error = Some(format!("offset {offset}: {e}"));
                return Outcome::Dropped(e);
            }
        };
        let key = category_key(&event, &self.field);
        let count = self.table.increment(&key);
        info!(offset, "Updated {} counts: {key} -> {count} ({} total)", self.field, self.table.total());
        Outcome::Counted { key, count }
    }

    pub fn chart(&self) -> PieChart {
        PieChart::new(&self.field, &self.table, self.min_share, self.start_angle_deg)
    }

    /// Process records until the source closes or a stop is requested,
    /// waiting at most `tick` between stop checks. On a stop, whatever the
    /// consumer already queued is still counted. Returns true if stopped.
    pub fn consume(&mut self, consumer: &ConsumerHandle, tick: Duration) -> bool {
        loop {
            if consumer.stop_requested() {
                warn!("Consumer interrupted by user.");
                for event in consumer.drain(usize::MAX) {
                    if let SourceEvent::Record(record) = event {
                        self.process(record);
                    }
                }
                return true;
            }
            match consumer.recv_timeout(tick) {
                Some(SourceEvent::Record(record)) => {
                    self.process(record);
                }
                Some(SourceEvent::Error(_)) | None => {}
                Some(SourceEvent::Closed) => return false,
            }
        }
    }
}
