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

use std::sync::Arc;

use crate::Backend;
use crate::Cause;
use crate::Error;
use crate::Level;
use crate::record::Metadata;
use crate::record::Record;

/// A named handle for writing log records.
///
/// Each leveled method forwards the message and the optional cause unchanged to the backend, at
/// the severity given by [`Level::severity`]. Whether the write happens before the method
/// returns depends on the backend:
///
/// * synchronous backends append on the calling thread and return the first append failure;
/// * asynchronous backends queue the record and return `Ok(())` at once, append failures go to
///   the backend's [`Trap`](crate::Trap).
///
/// After the backend is shut down, every call is discarded and returns `Ok(())`.
///
/// # Examples
///
/// ```
/// use logfacade::Cause;
/// use logfacade::append;
///
/// let backend = logfacade::Backend::builder()
///     .dispatch(|d| d.append(append::Stderr::default()))
///     .build();
/// let logger = backend.logger("billing");
///
/// logger.info("charge accepted", None).unwrap();
///
/// let err = std::io::Error::other("card expired");
/// logger.error("charge rejected", Some(Cause::from(err))).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    name: Arc<str>,
    backend: Backend,
}

impl Logger {
    pub(crate) fn new(name: Arc<str>, backend: Backend) -> Self {
        Self { name, backend }
    }

    /// The name records are written with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backend this logger writes to.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Whether a record at `level` would reach any appender.
    pub fn enabled(&self, level: Level) -> bool {
        self.backend
            .enabled(&Metadata::new(&self.name, level.severity()))
    }

    /// Log at [`Level::Trace`], written with the `Debug` severity.
    pub fn trace(&self, message: impl Into<String>, cause: Option<Cause>) -> Result<(), Error> {
        self.log(message, cause, Level::Trace)
    }

    /// Log at [`Level::Debug`].
    pub fn debug(&self, message: impl Into<String>, cause: Option<Cause>) -> Result<(), Error> {
        self.log(message, cause, Level::Debug)
    }

    /// Log at [`Level::Info`].
    pub fn info(&self, message: impl Into<String>, cause: Option<Cause>) -> Result<(), Error> {
        self.log(message, cause, Level::Info)
    }

    /// Log at [`Level::Warn`].
    pub fn warn(&self, message: impl Into<String>, cause: Option<Cause>) -> Result<(), Error> {
        self.log(message, cause, Level::Warn)
    }

    /// Log at [`Level::Error`].
    pub fn error(&self, message: impl Into<String>, cause: Option<Cause>) -> Result<(), Error> {
        self.log(message, cause, Level::Error)
    }

    /// Log at [`Level::Fatal`].
    pub fn fatal(&self, message: impl Into<String>, cause: Option<Cause>) -> Result<(), Error> {
        self.log(message, cause, Level::Fatal)
    }

    /// Log at the given level.
    ///
    /// This is the operation behind every leveled method; pass [`Level::default()`] for `Trace`.
    pub fn log(
        &self,
        message: impl Into<String>,
        cause: Option<Cause>,
        level: Level,
    ) -> Result<(), Error> {
        let record = Record::builder()
            .name(self.name.clone())
            .severity(level.severity())
            .message(message)
            .cause(cause)
            .build();
        self.backend.write(record)
    }
}
