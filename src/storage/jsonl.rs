//! Append-only JSONL audit store
//!
//! Each record is written as a single JSON line and flushed immediately.
//! Every write opens the file in append mode, so concurrent writers in the
//! same process never interleave partial lines.
//!
//! A line left incomplete by a crash is skipped on read, and the next
//! append starts on a fresh line so only the torn record is lost.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

use super::AuditStore;

/// Audit store backed by a line-delimited JSON file
pub struct JsonlAuditStore {
    log_path: PathBuf,
    /// Serializes writers within this process
    write_lock: Mutex<()>,
}

impl JsonlAuditStore {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }

    fn open_reader(&self) -> AuditResult<Option<BufReader<File>>> {
        if !self.log_path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;
        Ok(Some(BufReader::new(file)))
    }
}

impl AuditStore for JsonlAuditStore {
    fn insert(&self, record: &AuditRecord) -> AuditResult<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| AuditError::Json(format!("Failed to serialize audit record: {}", e)))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut line = String::with_capacity(json.len() + 2);
        if ends_mid_line(&mut file)? {
            tracing::warn!(path = %self.log_path.display(), "audit log ends with a partial line");
            line.push('\n');
        }
        line.push_str(&json);
        line.push('\n');

        file.write_all(line.as_bytes())
            .map_err(|e| AuditError::Io(format!("Failed to write audit record: {}", e)))?;

        file.flush()
            .map_err(|e| AuditError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    fn scan(&self) -> AuditResult<Vec<AuditRecord>> {
        let Some(reader) = self.open_reader()? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (line_num, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(|e| {
                AuditError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice::<AuditRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    path = %self.log_path.display(),
                    line = line_num + 1,
                    error = %e,
                    "skipping unreadable audit log line"
                ),
            }
        }

        Ok(records)
    }

    fn count(&self) -> AuditResult<usize> {
        self.scan().map(|records| records.len())
    }
}

/// True when the file is non-empty and its last byte is not a newline
fn ends_mid_line(file: &mut File) -> AuditResult<bool> {
    let len = file
        .metadata()
        .map_err(|e| AuditError::Io(format!("Failed to stat audit log: {}", e)))?
        .len();
    if len == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))
        .map_err(|e| AuditError::Io(format!("Failed to seek audit log: {}", e)))?;
    file.read_exact(&mut last)
        .map_err(|e| AuditError::Io(format!("Failed to read audit log tail: {}", e)))?;

    Ok(last[0] != b'\n')
}
