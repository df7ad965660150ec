//! Fixed-size worker pool with batch completion barriers
//!
//! Jobs carry no return value. Results travel through a [`SlotBuffer`], one
//! pre-sized slot per job, so no two jobs ever write the same location.

use crate::io::configuration::WORKERS_PER_CPU;
use crate::io::error::{MosaicError, Result, computation_error};
use parking_lot::{Condvar, Mutex};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Outstanding-job counter shared by a batch and its queued jobs
#[derive(Debug, Default)]
struct BatchState {
    pending: Mutex<usize>,
    drained: Condvar,
}

impl BatchState {
    fn begin(&self) {
        *self.pending.lock() += 1;
    }

    fn finish(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    fn wait(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.drained.wait(&mut pending);
        }
    }

    fn pending(&self) -> usize {
        *self.pending.lock()
    }
}

/// Pool of worker threads executing independent jobs
///
/// A job that panics is contained: the worker survives, the batch counter is
/// still released and the job's result slot simply stays empty. Dropping the
/// pool lets every queued job finish, then joins the workers.
pub struct JobScheduler {
    sender: Option<mpsc::Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    default_batch: Arc<BatchState>,
}

impl JobScheduler {
    /// Start a pool with `worker_count` threads
    ///
    /// # Errors
    ///
    /// Returns an error if `worker_count` is zero or a thread cannot be spawned
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(crate::io::error::invalid_parameter(
                "workers",
                &worker_count,
                &"must be strictly positive",
            ));
        }

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let receiver = Arc::clone(&receiver);
            let handle = thread::Builder::new()
                .name(format!("mosaic-worker-{index}"))
                .spawn(move || worker_loop(&receiver))
                .map_err(|source| MosaicError::WorkerSpawn { index, source })?;
            workers.push(handle);
        }

        log::debug!("Started {worker_count} scheduler workers");

        Ok(Self {
            sender: Some(sender),
            workers,
            default_batch: Arc::new(BatchState::default()),
        })
    }

    /// Start a pool sized to a multiple of the available hardware threads
    ///
    /// # Errors
    ///
    /// Returns an error if a worker thread cannot be spawned
    pub fn with_default_workers() -> Result<Self> {
        Self::new(default_worker_count())
    }

    /// Number of worker threads
    pub const fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job on the pool's default batch
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(&self.default_batch, job);
    }

    /// Block until every job submitted through [`Self::submit`] has finished
    pub fn await_all(&self) {
        self.default_batch.wait();
    }

    /// Open an independent batch with its own barrier
    ///
    /// Several batches can be in flight on one pool; awaiting one does not
    /// wait for jobs belonging to another.
    pub fn batch(&self) -> Batch<'_> {
        Batch {
            pool: self,
            state: Arc::new(BatchState::default()),
        }
    }

    /// Run `task(i)` for every `i < count` and collect the results by index
    ///
    /// A slot is `None` when its task returned `None` or panicked.
    ///
    /// # Errors
    ///
    /// Returns an error if the result slots are still shared after the barrier
    pub fn map_indexed<T, F>(&self, count: usize, task: F) -> Result<Vec<Option<T>>>
    where
        T: Send + Sync + 'static,
        F: Fn(usize) -> Option<T> + Send + Sync + 'static,
    {
        let buffer = SlotBuffer::new(count);
        let task = Arc::new(task);
        let batch = self.batch();

        for index in 0..count {
            let writer = buffer.writer();
            let task = Arc::clone(&task);
            batch.submit(move || {
                if let Some(value) = task(index) {
                    writer.set(index, value);
                }
            });
        }

        batch.await_all();
        buffer.into_results()
    }

    fn enqueue<F>(&self, state: &Arc<BatchState>, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        state.begin();
        let completion = Arc::clone(state);
        let wrapped: Job = Box::new(move || {
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                log::error!("A scheduled job panicked; its result is discarded");
            }
            completion.finish();
        });

        let rejected = match &self.sender {
            Some(sender) => sender.send(wrapped).err().map(|e| e.0),
            None => Some(wrapped),
        };

        // Without live workers the job still has to run for the barrier to release
        if let Some(job) = rejected {
            job();
        }
    }
}

impl Drop for JobScheduler {
    fn drop(&mut self) {
        drop(self.sender.take());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(receiver: &Mutex<mpsc::Receiver<Job>>) {
    loop {
        let next = receiver.lock().recv();
        match next {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
}

/// Default pool size: [`WORKERS_PER_CPU`] threads per logical CPU
pub fn default_worker_count() -> usize {
    num_cpus::get().max(1) * WORKERS_PER_CPU
}

/// Group of jobs sharing one completion barrier
pub struct Batch<'pool> {
    pool: &'pool JobScheduler,
    state: Arc<BatchState>,
}

impl Batch<'_> {
    /// Queue a job in this batch
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool.enqueue(&self.state, job);
    }

    /// Block until every job in this batch has finished
    pub fn await_all(&self) {
        self.state.wait();
    }

    /// Jobs submitted but not yet finished
    pub fn pending(&self) -> usize {
        self.state.pending()
    }
}

/// Pre-sized result storage written once per index from worker jobs
pub struct SlotBuffer<T> {
    slots: Arc<Vec<OnceLock<T>>>,
}

impl<T> SlotBuffer<T> {
    /// Allocate `len` empty slots
    pub fn new(len: usize) -> Self {
        Self {
            slots: Arc::new((0..len).map(|_| OnceLock::new()).collect()),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the buffer has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Handle that jobs use to fill their slot
    pub fn writer(&self) -> SlotWriter<T> {
        SlotWriter {
            slots: Arc::clone(&self.slots),
        }
    }

    /// Take the filled slots once every writer is gone
    ///
    /// # Errors
    ///
    /// Returns an error if a [`SlotWriter`] is still alive
    pub fn into_results(self) -> Result<Vec<Option<T>>> {
        Arc::into_inner(self.slots)
            .map(|slots| slots.into_iter().map(OnceLock::into_inner).collect())
            .ok_or_else(|| {
                computation_error("collect results", &"result slots are still being written")
            })
    }
}

/// Write access to a [`SlotBuffer`]
pub struct SlotWriter<T> {
    slots: Arc<Vec<OnceLock<T>>>,
}

impl<T> SlotWriter<T> {
    /// Fill slot `index`; returns `false` if it is out of range or already set
    pub fn set(&self, index: usize, value: T) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.set(value).is_ok())
    }
}

impl<T> Clone for SlotWriter<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}
