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

//! Application settings and the backend configuration file.
//!
//! Settings live in the application's own TOML configuration under a `[Logging]` table:
//!
//! ```toml
//! [Logging]
//! Header = "billing service starting"
//! RunOnSeparateThread = true
//! ConfigFilePath = "/etc/billing/logging.toml"
//! ```
//!
//! The backend configuration file, located by [`crate::init`], describes dispatches and their
//! appenders; see [`BackendConfig`].

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Error;
use crate::backend::DEFAULT_QUEUE_CAPACITY;
use crate::backend::DEFAULT_WORKER_THREADS;
use crate::backend::Overflow;

mod backend;
pub(crate) mod discovery;

pub use self::backend::AppenderConfig;
pub use self::backend::AppenderKind;
pub use self::backend::BackendConfig;
pub use self::backend::DispatchConfig;
pub use self::backend::LayoutKind;
pub use self::discovery::ConfigSource;
pub use self::discovery::DEFAULT_TEMPLATE;
pub use self::discovery::convention_file_name;

/// Logging settings read from the application configuration.
///
/// Every key is optional; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Settings {
    /// The banner written once the backend is initialized.
    ///
    /// Default to `Logging started for <application name>`.
    pub header: Option<String>,
    /// Whether log calls hand records to worker threads. Default to `true`.
    pub run_on_separate_thread: bool,
    /// An explicit path to the backend configuration file.
    pub config_file_path: Option<PathBuf>,
    /// The application name used for the conventional file name and the default template.
    ///
    /// Default to the file stem of the current executable.
    pub application_name: Option<String>,
    /// Where the conventional configuration file is looked up and materialized.
    ///
    /// Default to the directory of the current executable.
    pub config_directory: Option<PathBuf>,
    /// Whether the default template is written out when no configuration file is found.
    /// Default to `true`.
    pub materialize_default_config: bool,
    /// Worker threads draining the queue when running on separate threads.
    ///
    /// Above [`MAX_WORKER_THREADS`](crate::MAX_WORKER_THREADS) the backend runs synchronously.
    pub worker_threads: usize,
    /// Capacity of the queue when running on separate threads.
    ///
    /// Above [`MAX_QUEUE_CAPACITY`](crate::MAX_QUEUE_CAPACITY) the backend runs synchronously.
    pub queue_capacity: usize,
    /// What happens to a record when the queue is full.
    pub queue_overflow: Overflow,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            header: None,
            run_on_separate_thread: true,
            config_file_path: None,
            application_name: None,
            config_directory: None,
            materialize_default_config: true,
            worker_threads: DEFAULT_WORKER_THREADS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            queue_overflow: Overflow::Block,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AppSettings {
    #[serde(rename = "Logging", default)]
    logging: Settings,
}

impl Settings {
    /// Parse the `[Logging]` table out of an application configuration document.
    ///
    /// Other tables are ignored; a document without the table yields the defaults.
    ///
    /// ```
    /// use logfacade::Settings;
    ///
    /// let settings = Settings::from_toml_str(
    ///     r#"
    ///     [Database]
    ///     Url = "postgres://localhost/billing"
    ///
    ///     [Logging]
    ///     RunOnSeparateThread = false
    ///     "#,
    /// )
    /// .unwrap();
    /// assert!(!settings.run_on_separate_thread);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Settings, Error> {
        let app: AppSettings = toml::from_str(content)
            .map_err(|err| Error::new("failed to parse logging settings").with_source(err))?;
        Ok(app.logging)
    }

    /// Read the `[Logging]` table from the application configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Settings, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::new("failed to read application configuration")
                .with_context("path", path.display())
                .with_source(err)
        })?;
        Self::from_toml_str(&content).map_err(|err| err.with_context("path", path.display()))
    }

    /// The application name, falling back to the executable's file stem.
    pub fn resolved_application_name(&self) -> String {
        self.application_name
            .clone()
            .or_else(|| {
                let exe = std::env::current_exe().ok()?;
                exe.file_stem()?.to_str().map(str::to_string)
            })
            .unwrap_or_else(|| "application".to_string())
    }

    /// The configuration directory, falling back to the executable's directory.
    pub fn resolved_config_directory(&self) -> PathBuf {
        self.config_directory
            .clone()
            .or_else(|| {
                let exe = std::env::current_exe().ok()?;
                exe.parent().map(Path::to_path_buf)
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The banner written after initialization.
    pub fn resolved_header(&self, application_name: &str) -> String {
        self.header
            .clone()
            .unwrap_or_else(|| format!("Logging started for {application_name}"))
    }
}
