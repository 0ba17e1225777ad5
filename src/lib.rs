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

//! Logfacade is a leveled logging facade: application code logs through named [`Logger`]s and
//! never touches the sinks behind them.
//!
//! # Overview
//!
//! A [`Backend`] is created once at startup, either from application [`Settings`] with [`init`]
//! or programmatically with [`Backend::builder`], and passed to the components that log. It
//! hands out [`Logger`]s by name or by type. Each logger offers `trace`, `debug`, `info`, `warn`,
//! `error` and `fatal`, all taking a message and an optional [`Cause`].
//!
//! Records flow through dispatches: a dispatch is a set of filters and appenders, and an
//! appender renders records with a layout and writes them to a sink. When the backend runs on
//! separate threads, log calls only queue the record and a small pool of worker threads does the
//! writing; [`shutdown`] drains the queue before it returns.
//!
//! # Examples
//!
//! Set up from application settings:
//!
//! ```no_run
//! let settings = logfacade::Settings::from_toml_str(
//!     r#"
//!     [Logging]
//!     RunOnSeparateThread = true
//!     "#,
//! )
//! .unwrap();
//!
//! let backend = logfacade::init(&settings);
//! let logger = backend.logger("billing");
//! let _ = logger.info("charge accepted", None);
//!
//! logfacade::shutdown(&backend);
//! ```
//!
//! Set up programmatically:
//!
//! ```
//! use log::LevelFilter;
//! use logfacade::append;
//! use logfacade::filter::EnvFilter;
//!
//! struct Ledger;
//!
//! let backend = logfacade::Backend::builder()
//!     .dispatch(|d| {
//!         d.filter(EnvFilter::from(LevelFilter::Error))
//!             .append(append::Stderr::default())
//!     })
//!     .dispatch(|d| {
//!         d.filter(EnvFilter::from(LevelFilter::Info))
//!             .append(append::Stdout::default())
//!     })
//!     .build();
//!
//! let logger = backend.logger_for::<Ledger>();
//! logger.error("Error message.", None).unwrap();
//! logger.info("Info message.", None).unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod config;
pub mod filter;
pub mod layout;
pub mod record;
pub mod trap;

mod backend;
mod bridge;
mod error;
mod init;
mod logger;

pub use self::append::Append;
pub use self::backend::BACKEND_LOGGER_NAME;
pub use self::backend::Backend;
pub use self::backend::BackendBuilder;
pub use self::backend::DEFAULT_QUEUE_CAPACITY;
pub use self::backend::DEFAULT_WORKER_THREADS;
pub use self::backend::DispatchBuilder;
pub use self::backend::MAX_QUEUE_CAPACITY;
pub use self::backend::MAX_WORKER_THREADS;
pub use self::backend::Overflow;
pub use self::config::Settings;
pub use self::error::Error;
pub use self::filter::Filter;
pub use self::init::init;
pub use self::init::init_with_trap;
pub use self::init::shutdown;
pub use self::layout::Layout;
pub use self::logger::Logger;
pub use self::record::Cause;
pub use self::record::Level;
pub use self::record::Record;
pub use self::record::Severity;
pub use self::trap::DefaultTrap;
pub use self::trap::Trap;
