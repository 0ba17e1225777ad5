// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::append::Append;
use crate::append::single_file::single::SingleFileWriter;
use crate::append::single_file::single::SingleFileWriterBuilder;
use crate::layout::Layout;
use crate::layout::TextLayout;
use crate::record::Record;

/// An appender that writes log records to a file.
///
/// Records are appended to the end of the file; missing parent directories are created when the
/// appender is built. Writes are serialized, so the appender can be shared by the worker threads
/// of an asynchronous backend.
#[derive(Debug)]
pub struct SingleFile {
    layout: Box<dyn Layout>,
    writer: Mutex<SingleFileWriter>,
}

impl SingleFile {
    /// Open (or create) the log file at `log_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory or the log file cannot be created.
    pub fn new(log_path: impl Into<PathBuf>) -> Result<Self, Error> {
        let writer = SingleFileWriterBuilder::new(log_path).build()?;
        Ok(Self {
            layout: Box::new(TextLayout::default().no_color()),
            writer: Mutex::new(writer),
        })
    }

    /// Sets the layout for the logs.
    ///
    /// Default to [`TextLayout`] without colors.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    fn writer(&self) -> Result<MutexGuard<'_, SingleFileWriter>, Error> {
        self.writer
            .lock()
            .map_err(|_| Error::new("log file writer is poisoned"))
    }
}

impl Append for SingleFile {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        self.writer()?
            .write_all(&bytes)
            .map_err(|err| Error::new("failed to write record to log file").with_source(err))
    }

    fn flush(&self) -> Result<(), Error> {
        self.writer()?
            .flush()
            .map_err(|err| Error::new("failed to flush log file").with_source(err))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::Severity;

    #[test]
    fn test_single_file_writes_one_line_per_record() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("billing.log");
        let append = SingleFile::new(&path).unwrap();

        for message in ["charge accepted", "charge settled"] {
            let record = Record::builder()
                .name("billing")
                .severity(Severity::Info)
                .message(message)
                .build();
            append.append(&record).unwrap();
        }
        append.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO billing: charge accepted"));
        assert!(lines[1].ends_with("INFO billing: charge settled"));
    }
}
