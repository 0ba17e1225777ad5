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

//! Log record, levels and severities.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jiff::Timestamp;

use crate::Error;

/// The levels a [`Logger`](crate::Logger) accepts.
///
/// The default level is [`Level::Trace`], which is what [`Logger::log`](crate::Logger::log)
/// callers get when they do not care.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Designates very low priority, often extremely verbose, information.
    #[default]
    Trace,
    /// Designates lower priority information.
    Debug,
    /// Designates useful information.
    Info,
    /// Designates hazardous situations.
    Warn,
    /// Designates very serious errors.
    Error,
    /// Designates errors the application cannot recover from.
    Fatal,
}

impl Level {
    /// All levels, from the most verbose to the most severe.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Map this level onto the backend severity it is written with.
    ///
    /// The backend has no severity below [`Severity::Debug`], so both [`Level::Trace`] and
    /// [`Level::Debug`] are written as `Debug`.
    ///
    /// ```
    /// use logfacade::Level;
    /// use logfacade::Severity;
    ///
    /// assert_eq!(Level::Trace.severity(), Severity::Debug);
    /// assert_eq!(Level::Debug.severity(), Severity::Debug);
    /// assert_eq!(Level::Fatal.severity(), Severity::Fatal);
    /// ```
    pub fn severity(self) -> Severity {
        match self {
            Level::Trace | Level::Debug => Severity::Debug,
            Level::Info => Severity::Info,
            Level::Warn => Severity::Warn,
            Level::Error => Severity::Error,
            Level::Fatal => Severity::Fatal,
        }
    }

    /// Return the string representation of the `Level`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.as_str()) {
                return Ok(level);
            }
        }

        Err(Error::new(format!("malformed level: {s:?}")))
    }
}

/// The severities the backend writes records with.
///
/// Ordered from the least to the most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Diagnostic output.
    Debug,
    /// Informational output.
    Info,
    /// Something unexpected that the application tolerates.
    Warn,
    /// A failed operation.
    Error,
    /// A failure the application cannot recover from.
    Fatal,
}

impl Severity {
    /// Return the string representation of the `Severity`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// The closest [`log::Level`], used to match filter directives.
    ///
    /// `log` stops at `Error`, so `Fatal` is matched as `Error`.
    pub fn as_log_level(&self) -> log::Level {
        match self {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error | Severity::Fatal => log::Level::Error,
        }
    }
}

impl fmt::Debug for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An error attached to a log record.
///
/// Cloning a `Cause` shares the underlying error; the backend receives exactly the error the
/// caller passed in.
///
/// ```
/// use logfacade::Cause;
///
/// let err = std::io::Error::other("disk full");
/// let cause = Cause::from(err);
/// assert_eq!(cause.to_string(), "disk full");
/// ```
#[derive(Clone)]
pub struct Cause(Arc<dyn std::error::Error + Send + Sync + 'static>);

impl Cause {
    /// Wrap an already shared error without allocating again.
    pub fn from_arc(err: Arc<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Cause(err)
    }

    /// Borrow the underlying error.
    pub fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Whether two causes share the same underlying error.
    pub fn ptr_eq(this: &Cause, other: &Cause) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl<E> From<E> for Cause
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Cause(Arc::new(err))
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)?;

        if f.alternate() {
            let mut source = self.0.source();
            while let Some(err) = source {
                write!(f, ": {err}")?;
                source = err.source();
            }
        }

        Ok(())
    }
}

/// A log record as the backend sees it.
#[derive(Clone, Debug)]
pub struct Record {
    // the observed time
    time: Timestamp,

    // the metadata
    name: Arc<str>,
    severity: Severity,

    // the payload
    message: String,
    cause: Option<Cause>,
}

impl Record {
    /// The observed time.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// The name of the logger that produced the record.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The severity the record is written with.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Metadata about the record.
    pub fn metadata(&self) -> Metadata<'_> {
        Metadata {
            name: &self.name,
            severity: self.severity,
        }
    }

    /// The message body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error attached to the record, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Returns a new builder.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                time: Timestamp::now(),
                name: Arc::from(""),
                severity: Severity::Info,
                message: String::new(),
                cause: None,
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`time`](Record::time).
    pub fn time(mut self, time: Timestamp) -> Self {
        self.record.time = time;
        self
    }

    /// Set [`name`](Record::name).
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.record.name = name.into();
        self
    }

    /// Set [`severity`](Record::severity).
    pub fn severity(mut self, severity: Severity) -> Self {
        self.record.severity = severity;
        self
    }

    /// Set [`message`](Record::message).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.record.message = message.into();
        self
    }

    /// Set [`cause`](Record::cause).
    pub fn cause(mut self, cause: Option<Cause>) -> Self {
        self.record.cause = cause;
        self
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record {
        self.record
    }
}

/// Metadata about a log record, used by filters.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Metadata<'a> {
    name: &'a str,
    severity: Severity,
}

impl<'a> Metadata<'a> {
    /// Create metadata for a record that has not been built yet.
    pub fn new(name: &'a str, severity: Severity) -> Self {
        Metadata { name, severity }
    }

    /// Get the logger name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Get the severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }
}
