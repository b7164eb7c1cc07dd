use crate::payload::{Payload, Record};
use buzz_pie_common::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Blocking supplier of records, e.g. a Kafka consumer or a newline-delimited file.
pub trait RecordSource: Send {
    /// Human-readable origin for logs and the title bar.
    fn describe(&self) -> String;

    /// Block until the next record. `Ok(None)` means the stream ended or `stop`
    /// was raised while waiting.
    fn next_record(&mut self, stop: &AtomicBool) -> Result<Option<Record>>;

    fn close(&mut self) -> Result<()>;
}

/// One record per line; line bytes are handed over undecoded.
pub struct LineSource<R> {
    reader: R,
    name: String,
    line_no: i64,
    closed: bool,
}

impl<R: BufRead + Send> LineSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line_no: 0,
            closed: false,
        }
    }
}

impl LineSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl LineSource<BufReader<std::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()), "stdin")
    }
}

fn trim_line_end(buf: &mut Vec<u8>) {
    while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
        buf.pop();
    }
}

impl<R: BufRead + Send> RecordSource for LineSource<R> {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn next_record(&mut self, stop: &AtomicBool) -> Result<Option<Record>> {
        loop {
            if self.closed || stop.load(Ordering::Relaxed) {
                return Ok(None);
            }
            let mut buf = Vec::new();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(None);
            }
            let offset = self.line_no;
            self.line_no += 1;
            trim_line_end(&mut buf);
            if buf.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }
            return Ok(Some(Record::new(offset, Payload::Binary(buf))));
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
