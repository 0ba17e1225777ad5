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
use std::sync::Mutex;

use logfacade::Error;
use logfacade::Settings;
use logfacade::Trap;
use tempfile::TempDir;

#[derive(Debug, Default, Clone)]
struct CollectTrap(Arc<Mutex<Vec<String>>>);

impl CollectTrap {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Trap for CollectTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

fn settings(dir: &Path) -> Settings {
    Settings {
        application_name: Some("billing".to_string()),
        config_directory: Some(dir.to_path_buf()),
        run_on_separate_thread: false,
        ..Settings::default()
    }
}

fn write_file_config(dir: &Path, log_file: &str) -> std::path::PathBuf {
    let path = dir.join("custom-logging.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[[dispatches]]

[[dispatches.appenders]]
kind = "file"
path = "{log_file}"
"#
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_missing_configuration_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let settings = Settings {
        materialize_default_config: false,
        ..settings(dir.path())
    };

    let backend = logfacade::init_with_trap(&settings, trap.clone());
    let logger = backend.logger("billing");
    logger.warn("configuration missing", None).unwrap();
    assert!(logger.enabled(logfacade::Level::Info));
    assert!(!logger.enabled(logfacade::Level::Debug));
    logfacade::shutdown(&backend);

    let messages = trap.messages();
    assert_eq!(messages.len(), 1, "{messages:?}");
    assert!(messages[0].starts_with("no logging configuration file found"));
    assert!(!dir.path().join("billing.logging.toml").exists());
}

#[test]
fn test_explicit_configuration_file() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let config = write_file_config(dir.path(), "out/billing.log");
    let settings = Settings {
        config_file_path: Some(config.clone()),
        ..settings(dir.path())
    };

    let backend = logfacade::init_with_trap(&settings, trap.clone());
    backend
        .logger("billing::ledger")
        .error("ledger out of balance", None)
        .unwrap();
    logfacade::shutdown(&backend);

    assert!(trap.messages().is_empty(), "{:?}", trap.messages());

    let content = std::fs::read_to_string(dir.path().join("out/billing.log")).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 5, "{content}");
    assert!(lines[0].ends_with(" INFO logfacade: Logging started for billing"));
    assert!(lines[1].ends_with("DEBUG logfacade: run on separate thread: false"));
    assert!(lines[2].ends_with(&format!(
        "DEBUG logfacade: logging configuration loaded from {}",
        config.display()
    )));
    assert!(lines[3].ends_with("ERROR billing::ledger: ledger out of balance"));
    assert!(lines[4].ends_with("DEBUG logfacade: logging backend shut down"));
}

#[test]
fn test_convention_file_takes_effect() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let custom = write_file_config(dir.path(), "convention.log");
    std::fs::rename(custom, dir.path().join("billing.logging.toml")).unwrap();

    let settings = Settings {
        header: Some("billing v2 starting".to_string()),
        ..settings(dir.path())
    };
    let backend = logfacade::init_with_trap(&settings, trap.clone());
    let logger = backend.logger("billing");
    logger.info("ready", None).unwrap();
    logfacade::shutdown(&backend);

    assert!(trap.messages().is_empty(), "{:?}", trap.messages());
    let content = std::fs::read_to_string(dir.path().join("convention.log")).unwrap();
    assert!(content.contains("logfacade: billing v2 starting"));
    assert!(content.contains("billing: ready"), "{content}");
}

#[test]
fn test_default_template_is_materialized() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();

    let backend = logfacade::init_with_trap(&settings(dir.path()), trap.clone());
    let logger = backend.logger("billing");
    logger.debug("cache warmed", None).unwrap();
    logfacade::shutdown(&backend);

    assert!(trap.messages().is_empty(), "{:?}", trap.messages());

    let template = std::fs::read_to_string(dir.path().join("billing.logging.toml")).unwrap();
    assert!(template.contains("logs/billing.log"));
    assert!(!template.contains("{app_name}"));

    let content = std::fs::read_to_string(dir.path().join("logs/billing.log")).unwrap();
    assert!(content.contains("Logging started for billing"), "{content}");
    assert!(content.contains("billing: cache warmed"), "{content}");
}

#[test]
fn test_malformed_configuration_falls_back() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[[dispatches]]\nfilter = 3\n").unwrap();

    let settings = Settings {
        config_file_path: Some(config),
        ..settings(dir.path())
    };
    let backend = logfacade::init_with_trap(&settings, trap.clone());
    let logger = backend.logger("billing");
    logger.error("still logging", None).unwrap();
    logfacade::shutdown(&backend);

    let messages = trap.messages();
    assert_eq!(messages.len(), 1, "{messages:?}");
    assert!(
        messages[0].starts_with("failed to parse logging configuration"),
        "{messages:?}"
    );
}

#[test]
fn test_missing_explicit_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let settings = Settings {
        config_file_path: Some(dir.path().join("nowhere.toml")),
        materialize_default_config: false,
        ..settings(dir.path())
    };

    let backend = logfacade::init_with_trap(&settings, trap.clone());
    logfacade::shutdown(&backend);

    let messages = trap.messages();
    assert!(
        messages[0].starts_with("configured logging configuration file does not exist"),
        "{messages:?}"
    );
}

#[test]
fn test_async_init_drains_on_shutdown() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let config = write_file_config(dir.path(), "async.log");
    let settings = Settings {
        config_file_path: Some(config),
        run_on_separate_thread: true,
        ..settings(dir.path())
    };

    let backend = logfacade::init_with_trap(&settings, trap.clone());
    assert!(backend.is_async());
    let logger = backend.logger("billing");
    for i in 0..100 {
        logger.info(format!("invoice {i}"), None).unwrap();
    }
    logfacade::shutdown(&backend);

    assert!(trap.messages().is_empty(), "{:?}", trap.messages());
    let content = std::fs::read_to_string(dir.path().join("async.log")).unwrap();
    let invoices = content
        .lines()
        .filter(|line| line.contains("billing: invoice"))
        .count();
    assert_eq!(invoices, 100);
    assert!(content.contains("run on separate thread: true"));
    let last = content.lines().last().unwrap();
    assert!(last.ends_with("logging backend shut down"), "{last}");
}

#[test]
fn test_oversized_queue_capacity_falls_back_to_sync() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let config = write_file_config(dir.path(), "oversized.log");
    let mut settings = Settings::from_toml_str(
        "[Logging]\nRunOnSeparateThread = true\nQueueCapacity = 9223372036854775807\n",
    )
    .unwrap();
    settings.application_name = Some("billing".to_string());
    settings.config_directory = Some(dir.path().to_path_buf());
    settings.config_file_path = Some(config);

    let backend = logfacade::init_with_trap(&settings, trap.clone());
    assert!(!backend.is_async());
    let logger = backend.logger("billing");
    logger.info("still logging", None).unwrap();
    logfacade::shutdown(&backend);

    let messages = trap.messages();
    assert_eq!(messages.len(), 1, "{messages:?}");
    assert!(
        messages[0].starts_with("queue capacity is too large"),
        "{messages:?}"
    );

    let content = std::fs::read_to_string(dir.path().join("oversized.log")).unwrap();
    assert!(content.contains("run on separate thread: false"));
    assert!(content.contains("billing: still logging"), "{content}");
}

#[test]
fn test_empty_configuration_falls_back() {
    let dir = TempDir::new().unwrap();
    let trap = CollectTrap::default();
    let config = dir.path().join("empty.toml");
    std::fs::write(&config, "").unwrap();

    let settings = Settings {
        config_file_path: Some(config),
        ..settings(dir.path())
    };
    let backend = logfacade::init_with_trap(&settings, trap.clone());
    let logger = backend.logger("billing");
    assert!(logger.enabled(logfacade::Level::Info));
    logfacade::shutdown(&backend);

    let messages = trap.messages();
    assert_eq!(messages.len(), 1, "{messages:?}");
    assert!(
        messages[0].starts_with("logging configuration has no dispatches"),
        "{messages:?}"
    );
}
