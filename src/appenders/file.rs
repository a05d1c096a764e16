//! Plain file appender

use crate::core::appender::Appender;
use crate::core::encode::json_line;
use crate::core::error::{LoggerError, Result};
use crate::core::event::LogEvent;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends JSON lines to a single file, creating parent directories and the
/// file itself on construction. The file only ever grows; for bounded files
/// see [`RollingFileAppender`](crate::appenders::RollingFileAppender).
pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileAppender {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = open_appending(&path)?;
        Ok(Self {
            path,
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the file handle. Appending after close reopens it.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
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

pub(crate) fn open_appending(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("failed to create parent directory: {}", e),
                )
            })?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("failed to open: {}", e))
        })?;
    Ok(BufWriter::new(file))
}

impl Appender for FileAppender {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        let line = json_line(event);
        let writer = self.writer()?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
