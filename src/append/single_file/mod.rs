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

//! Appender for writing log records to a file.
//!
//! # Example
//!
//!```no_run
//! use logfacade::append::SingleFile;
//! use logfacade::filter::EnvFilter;
//!
//! let file_writer = SingleFile::new("/var/log/billing/billing.log").unwrap();
//!
//! let backend = logfacade::Backend::builder()
//!     .dispatch(|d| d.filter(EnvFilter::from(log::LevelFilter::Debug)).append(file_writer))
//!     .build();
//!
//! backend.logger("billing").info("This log will be written to a file.", None).unwrap();
//! ```

pub use append::SingleFile;

mod append;
mod single;
