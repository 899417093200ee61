//! Append-only JSONL event logging.
//!
//! Grounded on the teacher's `EventLogger`: a buffered writer plus a null
//! variant for tests, with a `PendingEvents` staging queue a tick's worth of
//! events can be drained into before being handed to the logger in order.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::event::SimEvent;

/// Writes events to a JSONL file, one object per line.
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
}

impl EventLogger {
    /// Opens (truncating) a JSONL file for writing.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
        })
    }

    /// A logger that discards everything it's given; used in tests and
    /// whenever only the in-memory event vector is wanted.
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn log(&mut self, event: &SimEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(writer) = self.writer.as_mut() {
            let json = serde_json::to_string(event)?;
            writeln!(writer, "{json}")?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, events: &[SimEvent]) -> std::io::Result<()> {
        for event in events {
            self.log(event)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            tracing::warn!(%err, "failed to flush event logger");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Visibility;
    use std::io::BufRead;

    #[test]
    fn logs_events_to_file() {
        let dir = std::env::temp_dir().join(format!("sim-events-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("events.jsonl");

        let mut logger = EventLogger::new(&path).unwrap();
        let event = SimEvent::new(1, 0, 1, "sim.started", Visibility::System, None, "start", None);
        logger.log(&event).unwrap();
        logger.flush().unwrap();

        let lines: Vec<String> = std::io::BufReader::new(File::open(&path).unwrap())
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 1);
        let parsed: SimEvent = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed.kind, "sim.started");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn null_logger_counts_without_writing() {
        let mut logger = EventLogger::null();
        let event = SimEvent::new(1, 0, 1, "sim.started", Visibility::System, None, "start", None);
        logger.log(&event).unwrap();
        assert_eq!(logger.event_count(), 1);
    }
}
