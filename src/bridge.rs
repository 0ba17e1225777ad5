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

//! Bridge the [`log`] crate's macros into a [`Backend`].

use log::LevelFilter;

use crate::Backend;
use crate::Level;
use crate::record::Metadata;
use crate::record::Record;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

impl Backend {
    /// Install a handle to this backend as the global [`log`] logger.
    ///
    /// Afterwards `log::info!` and friends write through this backend, named after the record
    /// target (the module path unless overridden).
    ///
    /// # Errors
    ///
    /// An error is returned if the global logger has already been set.
    pub fn apply(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for Backend {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let severity = Level::from(metadata.level()).severity();
        Backend::enabled(self, &Metadata::new(metadata.target(), severity))
    }

    fn log(&self, record: &log::Record) {
        if !log::Log::enabled(self, record.metadata()) {
            return;
        }

        let record = Record::builder()
            .name(record.target())
            .severity(Level::from(record.level()).severity())
            .message(record.args().to_string())
            .build();
        if let Err(err) = self.write(record) {
            self.trap(&err);
        }
    }

    fn flush(&self) {
        Backend::flush(self);
    }
}
