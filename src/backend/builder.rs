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

use std::sync::Arc;

use crate::Backend;
use crate::append::Append;
use crate::backend::Overflow;
use crate::backend::dispatch::Dispatch;
use crate::filter::Filter;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Default number of worker threads draining the asynchronous queue.
pub const DEFAULT_WORKER_THREADS: usize = 2;

/// Default capacity of the asynchronous queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// A builder for configuring dispatching and execution of a [`Backend`].
///
/// Records are written on the calling thread unless
/// [`run_on_separate_thread`](BackendBuilder::run_on_separate_thread) is enabled.
///
/// # Examples
///
/// ```
/// use logfacade::append;
///
/// let backend = logfacade::Backend::builder()
///     .dispatch(|d| d.append(append::Stderr::default()))
///     .build();
/// ```
#[must_use = "call `build` to construct the backend"]
#[derive(Debug)]
pub struct BackendBuilder {
    // stashed dispatches
    dispatches: Vec<Dispatch>,

    trap: Arc<dyn Trap>,
    header: Option<String>,

    // asynchronous execution
    run_on_separate_thread: bool,
    worker_threads: usize,
    queue_capacity: usize,
    overflow: Overflow,
}

impl Default for BackendBuilder {
    fn default() -> Self {
        BackendBuilder {
            dispatches: vec![],
            trap: Arc::new(DefaultTrap::default()),
            header: None,
            run_on_separate_thread: false,
            worker_threads: DEFAULT_WORKER_THREADS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow: Overflow::Block,
        }
    }
}

impl BackendBuilder {
    /// Register a new dispatch with the [`BackendBuilder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logfacade::append;
    /// use logfacade::filter::EnvFilter;
    ///
    /// let backend = logfacade::Backend::builder()
    ///     .dispatch(|d| {
    ///         d.filter("warn,billing=debug".parse::<EnvFilter>().unwrap())
    ///             .append(append::Stderr::default())
    ///     })
    ///     .build();
    /// ```
    pub fn dispatch<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DispatchBuilder<false>) -> DispatchBuilder<true>,
    {
        self.dispatches.push(f(DispatchBuilder::new()).build());
        self
    }

    pub(crate) fn push_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatches.push(dispatch);
        self
    }

    /// Set the trap receiving errors that cannot be returned to a caller.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = Arc::from(trap.into());
        self
    }

    pub(crate) fn shared_trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    /// Set the banner written once the backend is built.
    ///
    /// The banner is followed by a debug line stating whether records are written on a separate
    /// thread. Without a header, nothing is written on build.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Whether records are handed to worker threads instead of being written by the caller.
    ///
    /// Default to `false`.
    pub fn run_on_separate_thread(mut self, enabled: bool) -> Self {
        self.run_on_separate_thread = enabled;
        self
    }

    /// Set the number of worker threads; at least one is always started.
    ///
    /// More than [`MAX_WORKER_THREADS`](crate::MAX_WORKER_THREADS) is reported to the trap and
    /// the backend runs synchronously.
    pub fn worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    /// Set the number of records the queue holds before the overflow policy applies.
    ///
    /// Zero is raised to one. More than [`MAX_QUEUE_CAPACITY`](crate::MAX_QUEUE_CAPACITY) is
    /// reported to the trap and the backend runs synchronously.
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Set the overflow policy of the queue.
    ///
    /// Default to [`Overflow::Block`].
    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Build the [`Backend`].
    ///
    /// If the worker threads cannot be started, the error is sent to the trap and records are
    /// written on the calling thread instead.
    pub fn build(self) -> Backend {
        let BackendBuilder {
            dispatches,
            trap,
            header,
            run_on_separate_thread,
            worker_threads,
            queue_capacity,
            overflow,
        } = self;

        let backend = Backend::new(
            dispatches.into(),
            trap,
            run_on_separate_thread,
            worker_threads,
            queue_capacity,
            overflow,
        );

        if let Some(header) = header {
            backend.announce(header);
        }

        backend
    }
}

/// A builder for configuring a log dispatch, including filters and appenders.
///
/// # Examples
///
/// ```
/// use log::LevelFilter;
/// use logfacade::append;
/// use logfacade::filter::EnvFilter;
///
/// let backend = logfacade::Backend::builder()
///     .dispatch(|d| {
///         d.filter(EnvFilter::from(LevelFilter::Info))
///             .append(append::Stdout::default())
///     })
///     .build();
/// ```
#[derive(Debug)]
pub struct DispatchBuilder<const APPEND: bool> {
    filters: Vec<Box<dyn Filter>>,
    appends: Vec<Box<dyn Append>>,
}

impl DispatchBuilder<false> {
    fn new() -> Self {
        DispatchBuilder {
            filters: vec![],
            appends: vec![],
        }
    }

    /// Add a filter to this dispatch.
    pub fn filter(mut self, filter: impl Into<Box<dyn Filter>>) -> Self {
        self.filters.push(filter.into());
        self
    }
}

impl DispatchBuilder<true> {
    fn build(self) -> Dispatch {
        Dispatch::new(self.filters, self.appends)
    }
}

impl<const APPEND: bool> DispatchBuilder<APPEND> {
    /// Add an appender to this dispatch.
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> DispatchBuilder<true> {
        self.appends.push(append.into());
        DispatchBuilder {
            filters: self.filters,
            appends: self.appends,
        }
    }
}
