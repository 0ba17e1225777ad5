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
use std::sync::Mutex;
use std::thread::JoinHandle;

use arc_swap::ArcSwapOption;
use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;
use serde::Deserialize;

use crate::Error;
use crate::backend::dispatch::Dispatch;
use crate::record::Record;
use crate::trap::Trap;

/// Overflow policy for the asynchronous queue.
///
/// When the queue is full, an incoming record is handled according to the specified policy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Overflow {
    /// Blocks until the queue is not full.
    #[default]
    Block,
    /// Drops the incoming record.
    DropIncoming,
}

/// The largest queue capacity a backend accepts.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;

/// The largest number of worker threads a backend starts.
pub const MAX_WORKER_THREADS: usize = 64;

enum Task {
    Log(Record),
    Flush,
}

/// A bounded queue drained by a fixed set of worker threads.
#[derive(Debug)]
pub(crate) struct WorkerPool {
    // emptied on close; workers exit once the queue is drained and every sender is gone
    sender: ArcSwapOption<Sender<Task>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    overflow: Overflow,
}

impl WorkerPool {
    pub(crate) fn new(
        dispatches: Arc<[Dispatch]>,
        trap: Arc<dyn Trap>,
        worker_threads: usize,
        queue_capacity: usize,
        overflow: Overflow,
    ) -> Result<WorkerPool, Error> {
        if queue_capacity > MAX_QUEUE_CAPACITY {
            let err = Error::new("queue capacity is too large")
                .with_context("capacity", queue_capacity)
                .with_context("max", MAX_QUEUE_CAPACITY);
            return Err(err);
        }
        if worker_threads > MAX_WORKER_THREADS {
            let err = Error::new("too many worker threads")
                .with_context("threads", worker_threads)
                .with_context("max", MAX_WORKER_THREADS);
            return Err(err);
        }

        let worker_threads = worker_threads.max(1);
        let (sender, receiver) = crossbeam_channel::bounded(queue_capacity.max(1));

        let mut handles = Vec::with_capacity(worker_threads);
        for i in 0..worker_threads {
            let worker = Worker {
                receiver: receiver.clone(),
                dispatches: dispatches.clone(),
                trap: trap.clone(),
            };
            let handle = std::thread::Builder::new()
                .name(format!("logfacade-worker-{i}"))
                .spawn(move || worker.run())
                .map_err(|err| {
                    Error::new("failed to spawn log worker thread")
                        .with_context("worker", i)
                        .with_source(err)
                })?;
            handles.push(handle);
        }

        Ok(WorkerPool {
            sender: ArcSwapOption::from_pointee(sender),
            handles: Mutex::new(handles),
            overflow,
        })
    }

    pub(crate) fn submit(&self, record: Record) -> Result<(), Error> {
        self.send(Task::Log(record))
    }

    /// Queue a flush of every appender behind the records submitted so far.
    pub(crate) fn flush(&self) -> Result<(), Error> {
        self.send(Task::Flush)
    }

    fn send(&self, task: Task) -> Result<(), Error> {
        let sender = self.sender.load();
        let Some(sender) = sender.as_deref() else {
            return Err(Error::new("log worker pool is closed"));
        };

        let make_err = |task: Task| {
            Error::new(match task {
                Task::Log(_) => "failed to send record to log workers",
                Task::Flush => "failed to send flush to log workers",
            })
        };

        match self.overflow {
            Overflow::Block => sender.send(task).map_err(|err| make_err(err.0)),
            Overflow::DropIncoming => match sender.try_send(task) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Ok(()),
                Err(TrySendError::Disconnected(task)) => Err(make_err(task)),
            },
        }
    }

    /// Stop accepting records and wait until every queued record has been appended.
    pub(crate) fn close(&self, trap: &dyn Trap) {
        drop(self.sender.swap(None));

        let handles = match self.handles.lock() {
            Ok(mut handles) => std::mem::take(&mut *handles),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };

        let current = std::thread::current().id();
        for handle in handles {
            // closing from inside an appender must not join the calling worker
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                trap.trap(&Error::new("log worker thread panicked"));
            }
        }
    }
}

struct Worker {
    receiver: Receiver<Task>,
    dispatches: Arc<[Dispatch]>,
    trap: Arc<dyn Trap>,
}

impl Worker {
    fn run(self) {
        let Self {
            receiver,
            dispatches,
            trap,
        } = self;

        while let Ok(task) = receiver.recv() {
            match task {
                Task::Log(record) => {
                    for dispatch in dispatches.iter() {
                        if let Err(err) = dispatch.log(&record) {
                            let err = Error::new("failed to append record")
                                .with_context("logger", record.name())
                                .with_source(err);
                            trap.trap(&err);
                        }
                    }
                }
                Task::Flush => {
                    for dispatch in dispatches.iter() {
                        if let Err(err) = dispatch.flush() {
                            trap.trap(&Error::new("failed to flush appender").with_source(err));
                        }
                    }
                }
            }
        }
    }
}
