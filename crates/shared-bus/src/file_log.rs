//! # File Event Log
//!
//! Carries the replication channel across processes on one device.
//!
//! Every publish is appended as one JSON line to a shared log file, under
//! an exclusive `fs2` lock on the log itself. A tail task polls the file
//! and re-broadcasts lines written by other processes on a local
//! `InMemoryEventBus`, so subscribers see local and remote events alike.
//!
//! The tail starts at the end of the file: a process that opens the log
//! late sees nothing published before it joined. Only complete lines are
//! consumed. A log that grew past `max_bytes` is emptied when the next
//! process opens it.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::events::{EventEnvelope, EventFilter};
use crate::publisher::{EventPublisher, InMemoryEventBus};
use crate::subscriber::{EventSubscriber, Subscription};

/// How often the tail task looks for new lines.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Log size above which the next `open` starts it over.
pub const DEFAULT_MAX_LOG_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("Event log I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Event log encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One line of the log. `writer` identifies the log handle that appended it
/// so the handle can skip its own lines when tailing.
#[derive(Debug, Serialize, Deserialize)]
struct LogLine<E> {
    writer: Uuid,
    envelope: E,
}

pub struct FileEventLog {
    path: PathBuf,
    writer: Uuid,
    local: InMemoryEventBus,
    offset: Mutex<u64>,
    events_published: AtomicU64,
    poll_interval: Duration,
}

impl FileEventLog {
    /// Open (or lazily create) the log at `path` with default limits.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EventLogError> {
        Self::open_with(path, DEFAULT_POLL_INTERVAL, DEFAULT_MAX_LOG_BYTES)
    }

    pub fn open_with<P: AsRef<Path>>(
        path: P,
        poll_interval: Duration,
        max_bytes: u64,
    ) -> Result<Self, EventLogError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = Self::append_handle(&path)?;
        file.lock_exclusive()?;
        let mut len = file.metadata()?.len();
        if len > max_bytes {
            file.set_len(0)?;
            info!(path = %path.display(), bytes = len, "Event log compacted");
            len = 0;
        }
        file.unlock()?;

        let writer = Uuid::new_v4();
        info!(path = %path.display(), writer = %writer, offset = len, "Event log opened");

        Ok(Self {
            path,
            writer,
            local: InMemoryEventBus::new(),
            offset: Mutex::new(len),
            events_published: AtomicU64::new(0),
            poll_interval,
        })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribe to local and remote events matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.local.subscribe(filter)
    }

    /// Poll the log in the background until every other handle to `self`
    /// is dropped.
    pub fn spawn_tail(self: &Arc<Self>) -> JoinHandle<()> {
        let log = Arc::downgrade(self);
        let interval = self.poll_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(log) = log.upgrade() else {
                    debug!("Event log dropped, tail stopping");
                    break;
                };
                if let Err(e) = log.poll() {
                    warn!(path = %log.path.display(), error = %e, "Event log poll failed");
                }
            }
        })
    }

    /// Deliver every complete line appended by other handles since the
    /// last poll. Returns the number of envelopes delivered.
    pub fn poll(&self) -> Result<usize, EventLogError> {
        let mut offset = self.offset.lock();

        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                *offset = 0;
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata()?.len();
        if len < *offset {
            debug!(path = %self.path.display(), "Event log restarted, rewinding");
            *offset = 0;
        }
        if len == *offset {
            return Ok(0);
        }

        file.seek(SeekFrom::Start(*offset))?;
        let mut buf = Vec::new();
        file.take(len - *offset).read_to_end(&mut buf)?;
        let Some(end) = buf.iter().rposition(|b| *b == b'\n') else {
            return Ok(0);
        };
        *offset += end as u64 + 1;

        let mut delivered = 0;
        for line in buf[..end].split(|b| *b == b'\n').filter(|l| !l.is_empty()) {
            match serde_json::from_slice::<LogLine<EventEnvelope>>(line) {
                Ok(entry) if entry.writer == self.writer => {}
                Ok(entry) => {
                    self.local.publish(entry.envelope);
                    delivered += 1;
                }
                Err(e) => warn!(path = %self.path.display(), error = %e, "Skipping unreadable event line"),
            }
        }
        Ok(delivered)
    }

    fn append(&self, envelope: &EventEnvelope) -> Result<(), EventLogError> {
        let mut line = serde_json::to_vec(&LogLine {
            writer: self.writer,
            envelope,
        })?;
        line.push(b'\n');

        let mut file = Self::append_handle(&self.path)?;
        file.lock_exclusive()?;
        let written = file.write_all(&line);
        file.unlock()?;
        written.map_err(EventLogError::from)
    }

    fn append_handle(path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }
}

impl EventPublisher for FileEventLog {
    /// Append for other processes, then hand to local subscribers. A failed
    /// append is logged; local delivery still happens.
    fn publish(&self, envelope: EventEnvelope) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.append(&envelope) {
            warn!(
                path = %self.path.display(),
                kind = envelope.event.kind(),
                error = %e,
                "Event not appended to log"
            );
        }
        self.local.publish(envelope)
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl EventSubscriber for FileEventLog {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        FileEventLog::subscribe(self, filter)
    }
}
