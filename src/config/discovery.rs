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

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::config::BackendConfig;
use crate::config::Settings;
use crate::trap::Trap;

/// The configuration template written out when no configuration file exists.
///
/// Every `{app_name}` is replaced with the application name.
pub const DEFAULT_TEMPLATE: &str = include_str!("default.toml");

/// The file name looked up next to the application, `<application name>.logging.toml`.
pub fn convention_file_name(application_name: &str) -> String {
    format!("{application_name}.logging.toml")
}

/// Where the backend configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The file named by [`Settings::config_file_path`].
    Explicit(PathBuf),
    /// The conventional file in the configuration directory.
    Convention(PathBuf),
    /// The default template, freshly written to the conventional path.
    Template(PathBuf),
    /// No file; the backend runs with its built-in defaults.
    Defaults,
}

impl ConfigSource {
    /// The configuration file, unless the built-in defaults are used.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path)
            | ConfigSource::Convention(path)
            | ConfigSource::Template(path) => Some(path),
            ConfigSource::Defaults => None,
        }
    }
}

/// Find the backend configuration file.
///
/// Failures along the way are sent to the trap and the next candidate is tried.
pub(crate) fn locate(
    settings: &Settings,
    application_name: &str,
    config_directory: &Path,
    trap: &dyn Trap,
) -> ConfigSource {
    if let Some(path) = &settings.config_file_path {
        if path.is_file() {
            return ConfigSource::Explicit(path.clone());
        }
        let message = if path.exists() {
            "configured logging configuration path is not a file"
        } else {
            "configured logging configuration file does not exist"
        };
        trap.trap(&Error::new(message).with_context("path", path.display()));
    }

    let path = config_directory.join(convention_file_name(application_name));
    if path.is_file() {
        return ConfigSource::Convention(path);
    }

    if settings.materialize_default_config {
        match materialize(&path, application_name) {
            Ok(()) => return ConfigSource::Template(path),
            Err(err) => trap.trap(&err),
        }
    }

    trap.trap(
        &Error::new("no logging configuration file found")
            .with_context("directory", config_directory.display()),
    );
    ConfigSource::Defaults
}

/// Render the default template for `application_name`.
///
/// The name is escaped as the body of a TOML basic string.
pub(crate) fn render_template(application_name: &str) -> String {
    DEFAULT_TEMPLATE.replace("{app_name}", &escape_basic_string(application_name))
}

fn escape_basic_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

fn materialize(path: &Path, application_name: &str) -> Result<(), Error> {
    let make_err = |err: io::Error| {
        Error::new("failed to write default logging configuration")
            .with_context("path", path.display())
            .with_source(err)
    };

    let rendered = render_template(application_name);
    BackendConfig::from_toml_str(&rendered)
        .map_err(|err| err.with_context("application", application_name))?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(make_err)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        // written concurrently by another process; use theirs
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
        Err(err) => return Err(make_err(err)),
    };
    file.write_all(rendered.as_bytes()).map_err(make_err)?;
    file.flush().map_err(make_err)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Default)]
    struct CollectTrap(Mutex<Vec<String>>);

    impl Trap for CollectTrap {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.message().to_string());
        }
    }

    #[test]
    fn test_template_renders_application_name() {
        let rendered = render_template("billing");
        assert!(!rendered.contains("{app_name}"));
        assert!(rendered.contains(r#"path = "logs/billing.log""#));

        let config = BackendConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(config.dispatches.len(), 2);
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let explicit = temp_dir.path().join("custom.toml");
        std::fs::write(&explicit, "").unwrap();
        std::fs::write(temp_dir.path().join("billing.logging.toml"), "").unwrap();

        let settings = Settings {
            config_file_path: Some(explicit.clone()),
            ..Settings::default()
        };
        let trap = CollectTrap::default();
        let source = locate(&settings, "billing", temp_dir.path(), &trap);
        assert_eq!(source, ConfigSource::Explicit(explicit));
        assert!(trap.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_explicit_path_falls_back_to_convention() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let convention = temp_dir.path().join("billing.logging.toml");
        std::fs::write(&convention, "").unwrap();

        let settings = Settings {
            config_file_path: Some(temp_dir.path().join("missing.toml")),
            ..Settings::default()
        };
        let trap = CollectTrap::default();
        let source = locate(&settings, "billing", temp_dir.path(), &trap);
        assert_eq!(source, ConfigSource::Convention(convention));
        assert_eq!(
            *trap.0.lock().unwrap(),
            vec!["configured logging configuration file does not exist".to_string()]
        );
    }

    #[test]
    fn test_explicit_directory_is_not_a_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let settings = Settings {
            config_file_path: Some(temp_dir.path().to_path_buf()),
            materialize_default_config: false,
            ..Settings::default()
        };
        let trap = CollectTrap::default();
        let source = locate(&settings, "billing", temp_dir.path(), &trap);
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(
            *trap.0.lock().unwrap(),
            vec![
                "configured logging configuration path is not a file".to_string(),
                "no logging configuration file found".to_string(),
            ]
        );
    }

    #[test]
    fn test_template_escapes_application_name() {
        let name = "bill\"ing\\eu\nwest";
        let rendered = render_template(name);
        let config = BackendConfig::from_toml_str(&rendered).unwrap();

        let path = config.dispatches[1].appenders[0].path.as_deref().unwrap();
        assert_eq!(path, Path::new("logs/bill\"ing\\eu\nwest.log"));

        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let trap = CollectTrap::default();
        let source = locate(&Settings::default(), name, temp_dir.path(), &trap);
        assert!(matches!(source, ConfigSource::Template(_)), "{source:?}");
        assert!(trap.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_template_is_materialized() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let trap = CollectTrap::default();
        let source = locate(&Settings::default(), "billing", temp_dir.path(), &trap);

        let path = temp_dir.path().join("billing.logging.toml");
        assert_eq!(source, ConfigSource::Template(path.clone()));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            render_template("billing")
        );
    }

    #[test]
    fn test_defaults_without_materialization() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let settings = Settings {
            materialize_default_config: false,
            ..Settings::default()
        };
        let trap = CollectTrap::default();
        let source = locate(&settings, "billing", temp_dir.path(), &trap);
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(source.path(), None);
        assert!(!temp_dir.path().join("billing.logging.toml").exists());
        assert_eq!(
            *trap.0.lock().unwrap(),
            vec!["no logging configuration file found".to_string()]
        );
    }
}
