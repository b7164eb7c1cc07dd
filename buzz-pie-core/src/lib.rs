pub mod category;
pub mod chart;
pub mod consumer;
pub mod frequency;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod payload;
pub mod report;
pub mod source;
pub mod tally;

pub use buzz_pie_common::{BuzzPieError, Result};
pub use category::{category_key, normalize_category};
pub use chart::{display_slices, DisplaySlice, PieChart, Wedge};
pub use consumer::{spawn_consumer, ConsumerHandle, SourceEvent};
pub use frequency::FrequencyTable;
#[cfg(feature = "kafka")]
pub use kafka::KafkaSource;
pub use payload::{decode_payload, DecodeError, Event, Payload, Record};
pub use report::{print_summary, summary_json};
pub use source::{LineSource, RecordSource};
pub use tally::{Outcome, Tally};
