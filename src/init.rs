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
use std::sync::Arc;

use crate::Backend;
use crate::Error;
use crate::Severity;
use crate::append;
use crate::backend::Dispatch;
use crate::config::BackendConfig;
use crate::config::ConfigSource;
use crate::config::Settings;
use crate::config::discovery;
use crate::filter::EnvFilter;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Initialize a backend from application settings.
///
/// Errors are written to standard error and never abort initialization; see
/// [`init_with_trap`].
///
/// ```no_run
/// let settings = logfacade::Settings::load("billing.toml").unwrap_or_default();
/// let backend = logfacade::init(&settings);
///
/// let logger = backend.logger("billing");
/// let _ = logger.info("ready", None);
///
/// logfacade::shutdown(&backend);
/// ```
pub fn init(settings: &Settings) -> Backend {
    init_with_trap(settings, DefaultTrap::default())
}

/// Initialize a backend from application settings, sending failures to `trap`.
///
/// The backend configuration file is taken from, in order:
///
/// 1. [`Settings::config_file_path`], if the file exists;
/// 2. `<application name>.logging.toml` in the configuration directory;
/// 3. the default template, written to that conventional path when
///    [`Settings::materialize_default_config`] is set.
///
/// If no file is found or the file cannot be used, the failure is sent to the trap and the
/// backend falls back to its defaults: records at `info` and above go to standard error.
///
/// Once built, the backend writes the header line and a debug line stating whether records are
/// written on separate threads.
pub fn init_with_trap(settings: &Settings, trap: impl Into<Box<dyn Trap>>) -> Backend {
    let trap: Arc<dyn Trap> = Arc::from(trap.into());
    let application_name = settings.resolved_application_name();
    let config_directory = settings.resolved_config_directory();

    let source = discovery::locate(
        settings,
        &application_name,
        &config_directory,
        trap.as_ref(),
    );
    let (source, dispatches) = match load_dispatches(&source) {
        Ok(dispatches) => (source, dispatches),
        Err(err) => {
            trap.trap(&err);
            (ConfigSource::Defaults, vec![default_dispatch()])
        }
    };

    let backend = dispatches
        .into_iter()
        .fold(Backend::builder(), |builder, dispatch| {
            builder.push_dispatch(dispatch)
        })
        .shared_trap(trap)
        .header(settings.resolved_header(&application_name))
        .run_on_separate_thread(settings.run_on_separate_thread)
        .worker_threads(settings.worker_threads)
        .queue_capacity(settings.queue_capacity)
        .overflow(settings.queue_overflow)
        .build();

    match source.path() {
        Some(path) => backend.emit(
            Severity::Debug,
            format!("logging configuration loaded from {}", path.display()),
        ),
        None => backend.emit(Severity::Debug, "using default logging configuration"),
    }

    backend
}

/// Shut a backend down; see [`Backend::shutdown`].
///
/// Safe to call any number of times.
pub fn shutdown(backend: &Backend) {
    backend.shutdown();
}

fn load_dispatches(source: &ConfigSource) -> Result<Vec<Dispatch>, Error> {
    let Some(path) = source.path() else {
        return Ok(vec![default_dispatch()]);
    };

    let config = BackendConfig::load(path)?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    config
        .build(base_dir)
        .map_err(|err| err.with_context("path", path.display()))
}

fn default_dispatch() -> Dispatch {
    Dispatch::new(
        vec![Box::new(EnvFilter::from(log::LevelFilter::Info))],
        vec![Box::new(append::Stderr::default())],
    )
}
