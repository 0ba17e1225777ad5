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

use crate::Error;
use crate::append::Append;
use crate::filter::Filter;
use crate::filter::FilterResult;
use crate::record::Metadata;
use crate::record::Record;

/// A grouped set of filters and appenders.
///
/// `filters` determine whether a record reaches the appenders; the first filter that accepts or
/// rejects decides. `appends` write records to their sinks.
#[derive(Debug)]
pub(crate) struct Dispatch {
    filters: Vec<Box<dyn Filter>>,
    appends: Vec<Box<dyn Append>>,
}

impl Dispatch {
    pub(crate) fn new(filters: Vec<Box<dyn Filter>>, appends: Vec<Box<dyn Append>>) -> Dispatch {
        debug_assert!(
            !appends.is_empty(),
            "A Dispatch must have at least one appender"
        );

        Self { filters, appends }
    }

    pub(crate) fn enabled(&self, metadata: &Metadata) -> bool {
        for filter in &self.filters {
            match filter.enabled(metadata) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    /// Append the record to every appender, returning the first failure.
    ///
    /// A failing appender does not stop the others.
    pub(crate) fn log(&self, record: &Record) -> Result<(), Error> {
        if !self.enabled(&record.metadata()) {
            return Ok(());
        }

        let mut result = Ok(());
        for append in &self.appends {
            if let Err(err) = append.append(record) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    pub(crate) fn flush(&self) -> Result<(), Error> {
        let mut result = Ok(());
        for append in &self.appends {
            if let Err(err) = append.flush() {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }
}
