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

use std::fmt;

/// The error type of logfacade.
///
/// An error carries a message, key-value context naming what it was about, and the errors that
/// caused it:
///
/// ```text
/// failed to create log file (path: /var/log/billing.log): Permission denied (os error 13)
/// ```
pub struct Error {
    message: String,
    context: Vec<(&'static str, String)>,
    sources: Vec<anyhow::Error>,
}

impl Error {
    /// Create a new Error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: vec![],
            sources: vec![],
        }
    }

    /// Return the message of this error, without context or sources.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attach a key-value pair describing what the error is about.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Attach an error that caused this one.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        for (i, (key, value)) in self.context.iter().enumerate() {
            let sep = if i == 0 { " (" } else { ", " };
            write!(f, "{sep}{key}: {value}")?;
        }
        if !self.context.is_empty() {
            f.write_str(")")?;
        }

        for source in &self.sources {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("context", &self.context)
            .field("sources", &self.sources)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}
