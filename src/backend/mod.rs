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

//! The logging backend: dispatches, execution mode and lifecycle.

use std::sync::Arc;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::Logger;
use crate::Severity;
use crate::record::Metadata;
use crate::record::Record;
use crate::trap::Trap;

mod builder;
mod dispatch;
mod worker;

pub use self::builder::BackendBuilder;
pub use self::builder::DEFAULT_QUEUE_CAPACITY;
pub use self::builder::DEFAULT_WORKER_THREADS;
pub use self::builder::DispatchBuilder;
pub(crate) use self::dispatch::Dispatch;
pub use self::worker::MAX_QUEUE_CAPACITY;
pub use self::worker::MAX_WORKER_THREADS;
pub use self::worker::Overflow;
use self::worker::WorkerPool;

/// The name of the logger the backend writes its own lifecycle lines with.
pub const BACKEND_LOGGER_NAME: &str = "logfacade";

const RUNNING: u8 = 0;
const SHUT_DOWN: u8 = 1;

/// A handle to an initialized logging backend.
///
/// Handles are cheap to clone and all clones share the same dispatches and worker threads. Pass
/// one to every component that needs to log and hand out [`Logger`]s from it.
///
/// The backend is shut down by [`Backend::shutdown`] or when the last handle is dropped,
/// whichever comes first.
///
/// # Examples
///
/// ```
/// use logfacade::append;
///
/// let backend = logfacade::Backend::builder()
///     .dispatch(|d| d.append(append::Stdout::default()))
///     .build();
///
/// let logger = backend.logger("billing");
/// logger.info("charge accepted", None).unwrap();
///
/// backend.shutdown();
/// ```
#[derive(Clone, Debug)]
pub struct Backend(Arc<BackendInner>);

#[derive(Debug)]
struct BackendInner {
    dispatches: Arc<[Dispatch]>,
    pool: Option<WorkerPool>,
    trap: Arc<dyn Trap>,
    state: AtomicU8,
}

impl Backend {
    /// Create a new [`BackendBuilder`].
    pub fn builder() -> BackendBuilder {
        BackendBuilder::default()
    }

    fn new(
        dispatches: Arc<[Dispatch]>,
        trap: Arc<dyn Trap>,
        run_on_separate_thread: bool,
        worker_threads: usize,
        queue_capacity: usize,
        overflow: Overflow,
    ) -> Backend {
        let pool = if run_on_separate_thread {
            match WorkerPool::new(
                dispatches.clone(),
                trap.clone(),
                worker_threads,
                queue_capacity,
                overflow,
            ) {
                Ok(pool) => Some(pool),
                Err(err) => {
                    trap.trap(&err);
                    None
                }
            }
        } else {
            None
        };

        Backend(Arc::new(BackendInner {
            dispatches,
            pool,
            trap,
            state: AtomicU8::new(RUNNING),
        }))
    }

    /// Create a [`Logger`] bound to `name`.
    ///
    /// Every call returns a new `Logger`; loggers with the same name write to the same sinks.
    pub fn logger(&self, name: impl Into<Arc<str>>) -> Logger {
        Logger::new(name.into(), self.clone())
    }

    /// Create a [`Logger`] named after the type `T`.
    ///
    /// ```
    /// use logfacade::append;
    ///
    /// struct Ledger;
    ///
    /// let backend = logfacade::Backend::builder()
    ///     .dispatch(|d| d.append(append::Stdout::default()))
    ///     .build();
    ///
    /// let logger = backend.logger_for::<Ledger>();
    /// assert!(logger.name().ends_with("Ledger"));
    /// ```
    pub fn logger_for<T: ?Sized>(&self) -> Logger {
        self.logger(std::any::type_name::<T>())
    }

    /// Whether any dispatch would accept a record with the given metadata.
    ///
    /// Always `false` once the backend is shut down.
    pub fn enabled(&self, metadata: &Metadata) -> bool {
        !self.is_shut_down() && self.0.enabled(metadata)
    }

    /// Whether records are written by worker threads rather than by the caller.
    pub fn is_async(&self) -> bool {
        self.0.pool.is_some()
    }

    /// Whether [`Backend::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        self.0.state.load(Ordering::Acquire) == SHUT_DOWN
    }

    /// Whether two handles refer to the same backend.
    pub fn ptr_eq(this: &Backend, other: &Backend) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    /// Flush every appender; failures are sent to the trap.
    ///
    /// On a synchronous backend the appenders are flushed before this returns. On an
    /// asynchronous backend the flush is queued behind the records submitted so far and this
    /// returns at once; a worker flushes once it takes the flush off the queue. Records other
    /// workers are still appending at that moment may land after it. Use
    /// [`Backend::shutdown`] to wait for every queued record.
    pub fn flush(&self) {
        let inner = &self.0;
        if self.is_shut_down() {
            return;
        }

        match &inner.pool {
            Some(pool) => {
                if let Err(err) = pool.flush() {
                    if !self.is_shut_down() {
                        inner.trap.trap(&err);
                    }
                }
            }
            None => inner.flush(),
        }
    }

    /// Shut the backend down.
    ///
    /// Records submitted afterwards are discarded. Queued records are appended before this
    /// returns, then every appender is flushed. Calling it again does nothing.
    pub fn shutdown(&self) {
        self.0.shutdown();
    }

    /// Write a record through the configured execution mode.
    ///
    /// In synchronous mode the first append failure is returned. In asynchronous mode the record
    /// is queued and failures go to the trap.
    pub(crate) fn write(&self, record: Record) -> Result<(), Error> {
        let inner = &self.0;
        if self.is_shut_down() || !inner.enabled(&record.metadata()) {
            return Ok(());
        }

        match &inner.pool {
            Some(pool) => {
                if let Err(err) = pool.submit(record) {
                    // lost the race against shutdown
                    if !self.is_shut_down() {
                        inner.trap.trap(&err);
                    }
                }
                Ok(())
            }
            None => inner.dispatch(&record),
        }
    }

    pub(crate) fn trap(&self, err: &Error) {
        self.0.trap.trap(err);
    }

    /// Write one of the backend's own lines, sending failures to the trap.
    pub(crate) fn emit(&self, severity: Severity, message: impl Into<String>) {
        let record = Record::builder()
            .name(BACKEND_LOGGER_NAME)
            .severity(severity)
            .message(message)
            .build();
        if let Err(err) = self.write(record) {
            self.trap(&err);
        }
    }

    fn announce(&self, header: String) {
        self.emit(Severity::Info, header);
        self.emit(
            Severity::Debug,
            format!("run on separate thread: {}", self.is_async()),
        );
    }
}

impl BackendInner {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.dispatches
            .iter()
            .any(|dispatch| dispatch.enabled(metadata))
    }

    fn dispatch(&self, record: &Record) -> Result<(), Error> {
        let mut result = Ok(());
        for dispatch in self.dispatches.iter() {
            if let Err(err) = dispatch.log(record) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    fn flush(&self) {
        for dispatch in self.dispatches.iter() {
            if let Err(err) = dispatch.flush() {
                self.trap
                    .trap(&Error::new("failed to flush appender").with_source(err));
            }
        }
    }

    fn shutdown(&self) {
        if self
            .state
            .compare_exchange(RUNNING, SHUT_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        if let Some(pool) = &self.pool {
            pool.close(self.trap.as_ref());
        }

        let record = Record::builder()
            .name(BACKEND_LOGGER_NAME)
            .severity(Severity::Debug)
            .message("logging backend shut down")
            .build();
        if let Err(err) = self.dispatch(&record) {
            self.trap.trap(&err);
        }

        self.flush();
    }
}

impl Drop for BackendInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
