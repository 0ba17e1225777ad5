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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;

/// A writer for files.
#[derive(Debug)]
pub(crate) struct SingleFileWriter {
    writer: File,
}

impl Write for SingleFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A builder for configuring [`SingleFileWriter`].
#[derive(Debug)]
pub(crate) struct SingleFileWriterBuilder {
    // required
    filepath: PathBuf,
}

impl SingleFileWriterBuilder {
    /// Creates a new [`SingleFileWriterBuilder`].
    #[must_use]
    pub(crate) fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    /// Builds the [`SingleFileWriter`].
    pub(crate) fn build(self) -> Result<SingleFileWriter, Error> {
        let path = self.filepath.as_path();
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("path", dir.display())
                .with_source(err)
        })?;
        let writer = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|err| {
                Error::new("failed to create log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })?;
        Ok(SingleFileWriter { writer })
    }
}
