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

//! Provides [`env_filter`](https://crates.io/crates/env_filter) based filter for log records.

use std::str::FromStr;

use log::LevelFilter;

use crate::Error;
use crate::filter::Filter;
use crate::filter::FilterResult;
use crate::record::Metadata;

/// A filter consists of one or more comma-separated directives which match on logger names.
///
/// Each directive may have a corresponding maximum verbosity level which enables records that
/// match, for example `warn,billing=debug`. Logger names play the part of module paths, so a
/// directive for `billing` also covers `billing::ledger`.
///
/// Severities are matched through [`Severity::as_log_level`](crate::Severity::as_log_level):
/// `FATAL` records pass wherever `error` does.
///
/// The directive syntax is similar to that of [`env_logger`](https://crates.io/crates/env_logger)'s.
/// Read more from [the `env_logger` documentation](https://docs.rs/env_logger/#enabling-logging)
#[derive(Debug)]
pub struct EnvFilter(env_filter::Filter);

impl EnvFilter {
    /// Initializes the filter from the [EnvFilterBuilder].
    pub fn new(mut builder: EnvFilterBuilder) -> Self {
        EnvFilter(builder.0.build())
    }
}

impl Filter for EnvFilter {
    fn enabled(&self, metadata: &Metadata) -> FilterResult {
        let metadata = log::Metadata::builder()
            .level(metadata.severity().as_log_level())
            .target(metadata.name())
            .build();

        if self.0.enabled(&metadata) {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }
}

impl From<LevelFilter> for EnvFilter {
    fn from(filter: LevelFilter) -> Self {
        EnvFilter::new(EnvFilterBuilder::new().filter_level(filter))
    }
}

impl FromStr for EnvFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvFilterBuilder::new().try_parse(s).map(EnvFilter::new)
    }
}

/// A builder for the env log filter.
///
/// It can be used to parse a set of directives from a string before building a [EnvFilter]
/// instance.
#[derive(Default, Debug)]
pub struct EnvFilterBuilder(env_filter::Builder);

impl EnvFilterBuilder {
    /// Initializes the filter builder with defaults.
    pub fn new() -> Self {
        EnvFilterBuilder(env_filter::Builder::new())
    }

    /// Adds a directive to the filter for a specific logger name.
    pub fn filter_name(mut self, name: &str, level: LevelFilter) -> Self {
        self.0.filter_module(name, level);
        self
    }

    /// Adds a directive to the filter for all loggers.
    pub fn filter_level(mut self, level: LevelFilter) -> Self {
        self.0.filter_level(level);
        self
    }

    /// Parses the directive string, returning an error if the given directive string is invalid.
    ///
    /// See [the `env_logger` documentation](https://docs.rs/env_logger/#enabling-logging) for more details.
    pub fn try_parse(mut self, filters: &str) -> Result<Self, Error> {
        self.0.try_parse(filters).map_err(|err| {
            Error::new("failed to parse filter directives")
                .with_context("directives", filters)
                .with_source(err)
        })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    fn passes(filter: &EnvFilter, name: &str, severity: Severity) -> bool {
        match filter.enabled(&Metadata::new(name, severity)) {
            FilterResult::Neutral => true,
            FilterResult::Reject => false,
            FilterResult::Accept => unreachable!("env filters never accept outright"),
        }
    }

    #[test]
    fn test_directives_match_logger_names() {
        let filter: EnvFilter = "warn,billing=debug".parse().unwrap();

        assert!(passes(&filter, "billing", Severity::Debug));
        assert!(passes(&filter, "billing::ledger", Severity::Debug));
        assert!(!passes(&filter, "search", Severity::Info));
        assert!(passes(&filter, "search", Severity::Warn));
    }

    #[test]
    fn test_fatal_passes_error_threshold() {
        let filter = EnvFilter::from(LevelFilter::Error);
        assert!(passes(&filter, "app", Severity::Fatal));
        assert!(!passes(&filter, "app", Severity::Warn));
    }

    #[test]
    fn test_malformed_directives() {
        let err = "billing=loud".parse::<EnvFilter>().unwrap_err();
        assert_eq!(err.message(), "failed to parse filter directives");
    }
}
