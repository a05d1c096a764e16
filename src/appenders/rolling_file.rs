//! Size-based rotating file appender

use super::file::open_appending;
use crate::core::appender::Appender;
use crate::core::encode::json_line;
use crate::core::error::{LoggerError, Result};
use crate::core::event::LogEvent;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Timestamp suffix on rotated files, always UTC.
pub const ROLL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Appends JSON lines to a file and rotates it away once it would exceed a
/// size limit. The active file keeps its configured name; rotated files get a
/// UTC timestamp inserted before the extension, so `app.log` rotates to
/// `app_2024-03-15_10-30-45.log`.
///
/// Rotation happens before a write that would cross the limit, so a rotated
/// file never exceeds it. The one exception is a single event larger than the
/// whole limit, which is written intact to a fresh file rather than lost.
pub struct RollingFileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    max_bytes: u64,
    current_size: u64,
}

impl RollingFileAppender {
    /// Open `path` for appending with a rotation limit of `max_bytes`.
    ///
    /// If the file already holds `max_bytes` or more from a previous run it
    /// is rotated immediately.
    pub fn new(path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        if max_bytes == 0 {
            return Err(LoggerError::config(
                "RollingFileAppender",
                "max_bytes must be greater than zero",
            ));
        }

        let path = path.as_ref().to_path_buf();
        let writer = open_appending(&path)?;
        let current_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        let mut appender = Self {
            path,
            writer: Some(writer),
            max_bytes,
            current_size,
        };
        if appender.current_size >= max_bytes && appender.current_size > 0 {
            appender.roll();
        }
        Ok(appender)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Bytes written to the active file so far.
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Flush and release the file handle. Appending after close reopens it.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Destination name for a rotation at `moment`: the timestamp goes
    /// between the stem and the last-dot extension of the file name, or at
    /// the end when there is no extension.
    fn rolled_path(&self, moment: DateTime<Utc>) -> PathBuf {
        let stamp = moment.format(ROLL_TIMESTAMP_FORMAT);
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let rolled_name = match file_name.rfind('.') {
            Some(idx) => format!("{}_{}{}", &file_name[..idx], stamp, &file_name[idx..]),
            None => format!("{}_{}", file_name, stamp),
        };
        self.path.with_file_name(rolled_name)
    }

    // Rotate the active file away. Failure is reported to stderr and logging
    // continues into the current file; the size counter restarts either way
    // so a failed rotation cannot retry on every subsequent write.
    fn roll(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                eprintln!(
                    "[LOGGER WARNING] Failed to flush '{}' before rotation: {}",
                    self.path.display(),
                    e
                );
            }
        }

        let base = self.rolled_path(Utc::now());
        let base_name = base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut target = base.clone();
        // Two rotations within one second would collide on the timestamp
        let mut attempt = 1;
        while target.exists() {
            target = base.with_file_name(format!("{}.{}", base_name, attempt));
            attempt += 1;
        }

        if let Err(e) = std::fs::rename(&self.path, &target) {
            eprintln!(
                "[LOGGER WARNING] Failed to rotate '{}' to '{}': {}",
                self.path.display(),
                target.display(),
                e
            );
        }

        match open_appending(&self.path) {
            Ok(writer) => self.writer = Some(writer),
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Failed to reopen '{}' after rotation: {}",
                    self.path.display(),
                    e
                );
            }
        }
        self.current_size = 0;
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            self.writer = Some(open_appending(&self.path)?);
        }
        match self.writer.as_mut() {
            Some(writer) => Ok(writer),
            None => Err(LoggerError::file_appender(
                self.path.display().to_string(),
                "writer unavailable",
            )),
        }
    }
}

impl Appender for RollingFileAppender {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        let line = json_line(event);
        let incoming = line.len() as u64 + 1;

        if self.current_size > 0 && self.current_size + incoming > self.max_bytes {
            self.roll();
        }

        let writer = self.writer()?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rolling-file"
    }
}

impl Drop for RollingFileAppender {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
