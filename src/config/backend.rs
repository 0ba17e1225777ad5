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

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Error;
use crate::append;
use crate::append::Append;
use crate::backend::Dispatch;
use crate::filter::EnvFilter;
use crate::filter::Filter;
use crate::layout::Layout;
use crate::layout::TextLayout;

/// The backend configuration file.
///
/// ```toml
/// [[dispatches]]
/// filter = "info,billing::ledger=debug"
///
/// [[dispatches.appenders]]
/// kind = "stderr"
///
/// [[dispatches.appenders]]
/// kind = "file"
/// path = "logs/billing.log"
/// ```
///
/// Relative file paths are resolved against the directory holding the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// The dispatches, each with its own filter and appenders.
    #[serde(default)]
    pub dispatches: Vec<DispatchConfig>,
}

/// One dispatch of the backend configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Filter directives, e.g. `warn,billing=debug`. Without one, every record passes.
    #[serde(default)]
    pub filter: Option<String>,
    /// The appenders; at least one is required.
    pub appenders: Vec<AppenderConfig>,
}

/// One appender of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppenderConfig {
    /// The sink.
    pub kind: AppenderKind,
    /// How records are rendered.
    #[serde(default)]
    pub layout: LayoutKind,
    /// The log file; required by `file` appenders and ignored by the others.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// The sinks an appender can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppenderKind {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
    /// A single file, appended to.
    File,
    /// Output captured by the test harness.
    Testing,
}

/// The layouts an appender can render with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// [`TextLayout`].
    #[default]
    Text,
    /// `JsonLayout`, available with the `layout-json` feature.
    Json,
}

impl BackendConfig {
    /// Parse a backend configuration document.
    pub fn from_toml_str(content: &str) -> Result<BackendConfig, Error> {
        toml::from_str(content)
            .map_err(|err| Error::new("failed to parse logging configuration").with_source(err))
    }

    /// Read and parse the backend configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<BackendConfig, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::new("failed to read logging configuration")
                .with_context("path", path.display())
                .with_source(err)
        })?;
        Self::from_toml_str(&content).map_err(|err| err.with_context("path", path.display()))
    }

    /// Build the dispatches, resolving relative file paths against `base_dir`.
    ///
    /// Nothing is built unless every dispatch is valid, and at least one dispatch is required.
    pub(crate) fn build(&self, base_dir: &Path) -> Result<Vec<Dispatch>, Error> {
        if self.dispatches.is_empty() {
            return Err(Error::new("logging configuration has no dispatches"));
        }

        self.dispatches
            .iter()
            .enumerate()
            .map(|(i, dispatch)| {
                dispatch
                    .build(base_dir)
                    .map_err(|err| err.with_context("dispatch", i))
            })
            .collect()
    }
}

impl DispatchConfig {
    fn build(&self, base_dir: &Path) -> Result<Dispatch, Error> {
        if self.appenders.is_empty() {
            return Err(Error::new("dispatch has no appenders"));
        }

        let mut filters: Vec<Box<dyn Filter>> = vec![];
        if let Some(filter) = &self.filter {
            filters.push(Box::new(filter.parse::<EnvFilter>()?));
        }

        let appends = self
            .appenders
            .iter()
            .map(|appender| appender.build(base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dispatch::new(filters, appends))
    }
}

impl AppenderConfig {
    fn build(&self, base_dir: &Path) -> Result<Box<dyn Append>, Error> {
        let append: Box<dyn Append> = match self.kind {
            AppenderKind::Stdout => Box::new(append::Stdout::default().with_layout(self.layout()?)),
            AppenderKind::Stderr => Box::new(append::Stderr::default().with_layout(self.layout()?)),
            AppenderKind::Testing => {
                Box::new(append::Testing::default().with_layout(self.layout()?))
            }
            AppenderKind::File => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| Error::new("file appender requires a path"))?;
                let layout: Box<dyn Layout> = match self.layout {
                    LayoutKind::Text => Box::new(TextLayout::default().no_color()),
                    LayoutKind::Json => self.layout()?,
                };
                Box::new(append::SingleFile::new(base_dir.join(path))?.with_layout(layout))
            }
        };
        Ok(append)
    }

    fn layout(&self) -> Result<Box<dyn Layout>, Error> {
        match self.layout {
            LayoutKind::Text => Ok(Box::new(TextLayout::default())),
            #[cfg(feature = "layout-json")]
            LayoutKind::Json => Ok(Box::new(crate::layout::JsonLayout::default())),
            #[cfg(not(feature = "layout-json"))]
            LayoutKind::Json => {
                let err = Error::new("json layout requires the `layout-json` feature");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_dispatches() {
        let config = BackendConfig::from_toml_str(
            r#"
            [[dispatches]]
            filter = "info"

            [[dispatches.appenders]]
            kind = "stderr"

            [[dispatches]]
            [[dispatches.appenders]]
            kind = "file"
            path = "logs/billing.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatches.len(), 2);
        assert_eq!(config.dispatches[0].filter.as_deref(), Some("info"));
        assert_eq!(config.dispatches[0].appenders[0].kind, AppenderKind::Stderr);
        assert_eq!(config.dispatches[0].appenders[0].layout, LayoutKind::Text);
        assert_eq!(config.dispatches[1].filter, None);
        assert_eq!(
            config.dispatches[1].appenders[0].path.as_deref(),
            Some(Path::new("logs/billing.log"))
        );
    }

    #[test]
    fn test_unknown_appender_kind() {
        let err = BackendConfig::from_toml_str(
            r#"
            [[dispatches]]
            [[dispatches.appenders]]
            kind = "syslog"
            "#,
        )
        .unwrap_err();
        assert_eq!(err.message(), "failed to parse logging configuration");
    }

    #[test]
    fn test_build_resolves_file_paths_against_base_dir() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let config = BackendConfig::from_toml_str(
            r#"
            [[dispatches]]
            [[dispatches.appenders]]
            kind = "file"
            path = "logs/billing.log"
            "#,
        )
        .unwrap();

        let dispatches = config.build(temp_dir.path()).unwrap();
        assert_eq!(dispatches.len(), 1);
        assert!(temp_dir.path().join("logs").join("billing.log").is_file());
    }

    #[test]
    fn test_build_rejects_invalid_dispatches() {
        let no_appenders = BackendConfig {
            dispatches: vec![DispatchConfig {
                filter: None,
                appenders: vec![],
            }],
        };
        let err = no_appenders.build(Path::new(".")).unwrap_err();
        assert_eq!(err.message(), "dispatch has no appenders");

        let no_path = BackendConfig {
            dispatches: vec![DispatchConfig {
                filter: Some("debug".to_string()),
                appenders: vec![AppenderConfig {
                    kind: AppenderKind::File,
                    layout: LayoutKind::Text,
                    path: None,
                }],
            }],
        };
        let err = no_path.build(Path::new(".")).unwrap_err();
        assert_eq!(err.message(), "file appender requires a path");
    }

    #[test]
    fn test_build_rejects_empty_configuration() {
        let config = BackendConfig::from_toml_str("# nothing here\n").unwrap();
        assert!(config.dispatches.is_empty());

        let err = config.build(Path::new(".")).unwrap_err();
        assert_eq!(err.message(), "logging configuration has no dispatches");
    }
}
