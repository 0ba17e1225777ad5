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

use crate::Error;
use crate::append::Append;
use crate::layout::Layout;
use crate::layout::TextLayout;
use crate::record::Record;

/// An appender that prints log records to stdout.
///
/// # Examples
///
/// ```
/// use logfacade::append::Stdout;
///
/// let stdout_appender = Stdout::default();
/// ```
#[derive(Debug)]
pub struct Stdout {
    layout: Box<dyn Layout>,
}

impl Default for Stdout {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Stdout {
    /// Set the layout for the [`Stdout`] appender.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Stdout {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        std::io::stdout()
            .write_all(&bytes)
            .map_err(|err| Error::new("failed to write record to stdout").with_source(err))
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stdout()
            .flush()
            .map_err(|err| Error::new("failed to flush stdout").with_source(err))
    }
}

/// An appender that prints log records to stderr.
///
/// # Examples
///
/// ```
/// use logfacade::append::Stderr;
///
/// let stderr_appender = Stderr::default();
/// ```
#[derive(Debug)]
pub struct Stderr {
    layout: Box<dyn Layout>,
}

impl Default for Stderr {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Stderr {
    /// Set the layout for the [`Stderr`] appender.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Stderr {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        std::io::stderr()
            .write_all(&bytes)
            .map_err(|err| Error::new("failed to write record to stderr").with_source(err))
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stderr()
            .flush()
            .map_err(|err| Error::new("failed to flush stderr").with_source(err))
    }
}
