//! File-backed console that records a session as a JSONL tape and can replay
//! any recorded snapshot back into the live session.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::{Action, ConsoleMessage};
use super::{Connection, DevtoolsExtension, MessageHandler};
use crate::config::ConnectConfig;
use crate::unit::subscription::{Listeners, Subscription};

pub const TAPE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TapeEntry {
    Init {
        seq: u64,
        ts_ms: u64,
        session: String,
        state: Value,
    },
    Action {
        seq: u64,
        ts_ms: u64,
        session: String,
        action: Action,
        state: Value,
    },
}

impl TapeEntry {
    pub fn session(&self) -> &str {
        match self {
            TapeEntry::Init { session, .. } | TapeEntry::Action { session, .. } => session,
        }
    }

    pub fn state(&self) -> &Value {
        match self {
            TapeEntry::Init { state, .. } | TapeEntry::Action { state, .. } => state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TapeLine {
    Header {
        schema_version: u32,
        created_at_ms: u64,
    },
    Entry {
        entry: TapeEntry,
    },
}

/// A recorded tape loaded back from disk
#[derive(Debug, Clone)]
pub struct Tape {
    pub schema_version: u32,
    pub created_at_ms: u64,
    pub entries: Vec<TapeEntry>,
}

impl Tape {
    /// Loads a tape. Blank lines are ignored; the first remaining line must
    /// be the header and every line after it an entry.
    pub fn read_jsonl_from_path(path: &Path) -> io::Result<Self> {
        let mut lines = BufReader::new(File::open(path)?)
            .lines()
            .filter(|line| !matches!(line, Ok(text) if text.trim().is_empty()));

        let Some(first) = lines.next().transpose()? else {
            return Err(invalid_tape("missing tape header"));
        };
        let TapeLine::Header {
            schema_version,
            created_at_ms,
        } = parse_tape_line(&first)?
        else {
            return Err(invalid_tape("tape must start with a header line"));
        };

        let entries = lines
            .map(|line| match parse_tape_line(&line?)? {
                TapeLine::Entry { entry } => Ok(entry),
                TapeLine::Header { .. } => Err(invalid_tape("tape has more than one header")),
            })
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Self {
            schema_version,
            created_at_ms,
            entries,
        })
    }

    /// Entries recorded for one session, in order
    pub fn session_entries<'a>(&'a self, session: &'a str) -> impl Iterator<Item = &'a TapeEntry> {
        self.entries.iter().filter(move |e| e.session() == session)
    }
}

fn parse_tape_line(line: &str) -> io::Result<TapeLine> {
    serde_json::from_str(line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn invalid_tape(reason: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, reason.to_string())
}

struct TapeWriter {
    seq: AtomicU64,
    writer: Mutex<BufWriter<File>>,
}

impl TapeWriter {
    fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let header = TapeLine::Header {
            schema_version: TAPE_SCHEMA_VERSION,
            created_at_ms: now_ms(),
        };
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&header).map_err(io::Error::other)?
        )?;
        writer.flush()?;
        Ok(Self {
            seq: AtomicU64::new(1),
            writer: Mutex::new(writer),
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    fn append(&self, entry: TapeEntry) -> io::Result<()> {
        let line = TapeLine::Entry { entry };
        let json = serde_json::to_string(&line).map_err(io::Error::other)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{json}")?;
        writer.flush()?;
        Ok(())
    }
}

/// Console that appends every `init` and `send` to a JSONL tape.
pub struct TapeConsole {
    path: PathBuf,
    writer: Arc<TapeWriter>,
    connections: Mutex<HashMap<String, Arc<TapeConnection>>>,
}

impl TapeConsole {
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let writer = Arc::new(TapeWriter::create(&path)?);
        Ok(Self {
            path,
            writer,
            connections: Mutex::new(HashMap::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> io::Result<Tape> {
        Tape::read_jsonl_from_path(&self.path)
    }

    /// Restores the snapshot recorded at `index` (0 = the `init` baseline)
    /// for `session` by dispatching a jump command to its subscribers.
    pub fn jump_to(&self, session: &str, index: usize) -> anyhow::Result<()> {
        let tape = self.read().context("failed to read tape")?;
        let entry = tape
            .session_entries(session)
            .nth(index)
            .with_context(|| format!("no tape entry {index} for session {session}"))?;
        let connection = self
            .connections
            .lock()
            .get(session)
            .cloned()
            .with_context(|| format!("session {session} is not connected"))?;

        tracing::debug!(session, index, "Jumping to recorded state");
        connection.dispatch(&ConsoleMessage::jump_to_action(index as u64, entry.state()));
        Ok(())
    }
}

impl DevtoolsExtension for TapeConsole {
    fn connect(&self, config: &ConnectConfig) -> Arc<dyn Connection> {
        let connection = Arc::new(TapeConnection {
            session: config.name.clone(),
            writer: self.writer.clone(),
            handlers: Listeners::new(),
        });
        self.connections
            .lock()
            .insert(config.name.clone(), connection.clone());
        connection
    }
}

struct TapeConnection {
    session: String,
    writer: Arc<TapeWriter>,
    handlers: Arc<Listeners<ConsoleMessage>>,
}

impl TapeConnection {
    fn record(&self, entry: TapeEntry) {
        if let Err(e) = self.writer.append(entry) {
            tracing::warn!(session = %self.session, error = %e, "Failed to append tape entry");
        }
    }

    fn dispatch(&self, message: &ConsoleMessage) {
        self.handlers.notify(message);
    }
}

impl Connection for TapeConnection {
    fn init(&self, state: &Value) {
        self.record(TapeEntry::Init {
            seq: self.writer.next_seq(),
            ts_ms: now_ms(),
            session: self.session.clone(),
            state: state.clone(),
        });
    }

    fn send(&self, action: &Action, state: &Value, _config: &ConnectConfig) {
        self.record(TapeEntry::Action {
            seq: self.writer.next_seq(),
            ts_ms: now_ms(),
            session: self.session.clone(),
            action: action.clone(),
            state: state.clone(),
        });
    }

    fn subscribe(&self, handler: MessageHandler) -> Subscription {
        self.handlers.add(handler)
    }
}

fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
