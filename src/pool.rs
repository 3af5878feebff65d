//! The worker pool backing [`crate::Entity::from_writer`].
use std::io::{self, Read, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::log::{info, warning};

/// Configuration for the [`WriterPool`] that backs `Entity::from_writer`,
/// named to match the tunables an embedder of this crate would expect to
/// expose (e.g. via environment or config file): a core set of threads
/// kept warm, an overflow up to a max, a keep-alive for idle overflow
/// threads, and a bound on how many producer closures may be queued before
/// a submission either blocks or falls back to a dedicated thread.
#[derive(Clone, Debug)]
pub struct WorkerPoolConfig {
    pub core_pool_size: usize,
    pub max_pool_size: usize,
    pub keep_alive: Duration,
    pub queue_size: usize,
    /// Log a warning when the pool is saturated and a dedicated thread is
    /// spawned instead of queuing.
    pub show_rejected_warning: bool,
}

impl Default for WorkerPoolConfig {
    fn default() -> WorkerPoolConfig {
        WorkerPoolConfig {
            core_pool_size: 4,
            max_pool_size: 32,
            keep_alive: Duration::from_secs(60),
            queue_size: 64,
            show_rejected_warning: true,
        }
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A bounded thread pool dedicated to running `Entity::from_writer`
/// producer closures. Submissions beyond `max_pool_size` busy threads and
/// a full `queue_size` do not block the caller indefinitely: the job runs
/// on its own ad hoc thread instead, matching the "reject then fall back"
/// policy of a bounded executor that refuses to apply backpressure to a
/// caller building a response.
pub struct WriterPool {
    sender: SyncSender<Job>,
    receiver: Arc<Mutex<Receiver<Job>>>,
    state: Arc<Mutex<State>>,
    config: WorkerPoolConfig,
}

struct State {
    live_threads: usize,
}

impl std::fmt::Debug for WriterPool {
    /// Omits `sender`/`receiver`/`state` — none of the channel or lock
    /// types are `Debug`; `config` is the part a caller would want to see.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterPool").field("config", &self.config).finish()
    }
}

impl WriterPool {
    pub fn new(config: WorkerPoolConfig) -> WriterPool {
        let (sender, receiver) = sync_channel::<Job>(config.queue_size);
        let receiver = Arc::new(Mutex::new(receiver));
        let state = Arc::new(Mutex::new(State { live_threads: 0 }));

        for _ in 0..config.core_pool_size {
            spawn_core_worker(Arc::clone(&receiver), Arc::clone(&state));
        }

        WriterPool { sender, receiver, state, config }
    }

    /// Runs `produce` with a writer end of a bounded pipe, returning the
    /// reader end immediately. If the pool's queue is full, the job is
    /// run on a dedicated, non-pooled thread instead of blocking here.
    pub fn spawn<F>(&self, produce: F) -> PipeReader
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()> + Send + 'static,
    {
        let (pipe_writer, pipe_reader) = pipe(8 * 1024);
        let job: Job = Box::new(move || {
            let mut writer = pipe_writer;
            let result = produce(&mut writer);
            writer.finish(result);
        });

        match self.sender.try_send(job) {
            Ok(()) => {
                let mut state = self.state.lock().unwrap();
                if state.live_threads < self.config.max_pool_size {
                    state.live_threads += 1;
                    drop(state);
                    spawn_overflow_worker(
                        Arc::clone(&self.receiver),
                        Arc::clone(&self.state),
                        self.config.keep_alive,
                    );
                }
            }
            Err(std::sync::mpsc::TrySendError::Full(job))
            | Err(std::sync::mpsc::TrySendError::Disconnected(job)) => {
                if self.config.show_rejected_warning {
                    warning!("writer pool saturated, running producer on a dedicated thread");
                }
                thread::spawn(job);
            }
        }
        pipe_reader
    }
}

fn spawn_core_worker(receiver: Arc<Mutex<Receiver<Job>>>, state: Arc<Mutex<State>>) {
    thread::spawn(move || loop {
        let job = {
            let receiver = receiver.lock().unwrap();
            receiver.recv()
        };
        match job {
            Ok(job) => job(),
            Err(_) => {
                info!("writer pool core worker shutting down, channel closed");
                break;
            }
        }
    });
    state.lock().unwrap().live_threads += 1;
}

/// Spawns a temporary worker beyond `core_pool_size`, draining the shared
/// queue until it sits idle for `keep_alive`, then exits and releases its
/// slot. Unlike a core worker it never blocks forever on an empty queue.
fn spawn_overflow_worker(receiver: Arc<Mutex<Receiver<Job>>>, state: Arc<Mutex<State>>, keep_alive: Duration) {
    thread::spawn(move || loop {
        let job = {
            let receiver = receiver.lock().unwrap();
            receiver.recv_timeout(keep_alive)
        };
        match job {
            Ok(job) => job(),
            Err(_) => {
                state.lock().unwrap().live_threads -= 1;
                break;
            }
        }
    });
}

/// Error cell shared between the two pipe halves so the reader can
/// surface a write-side I/O error instead of a bare EOF.
struct Shared {
    error: Mutex<Option<io::Error>>,
}

/// The writer half of the bounded in-memory pipe: a producer closure
/// writes into this; it blocks (via the bounded channel) once the reader
/// has not kept up within `capacity` bytes of buffering.
pub struct PipeWriter {
    sender: SyncSender<Vec<u8>>,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for PipeWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeWriter").finish_non_exhaustive()
    }
}

impl PipeWriter {
    fn finish(self, result: io::Result<()>) {
        if let Err(e) = result {
            *self.shared.error.lock().unwrap() = Some(e);
        }
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sender
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The reader half, implementing [`Read`] over whatever chunks the
/// producer thread has written so far.
pub struct PipeReader {
    receiver: Receiver<Vec<u8>>,
    shared: Arc<Shared>,
    pending: Vec<u8>,
    pending_pos: usize,
}

impl std::fmt::Debug for PipeReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeReader").field("buffered", &(self.pending.len() - self.pending_pos)).finish()
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending_pos >= self.pending.len() {
            match self.receiver.recv() {
                Ok(chunk) => {
                    self.pending = chunk;
                    self.pending_pos = 0;
                }
                Err(_) => {
                    if let Some(e) = self.shared.error.lock().unwrap().take() {
                        return Err(e);
                    }
                    return Ok(0);
                }
            }
        }
        let available = &self.pending[self.pending_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pending_pos += n;
        Ok(n)
    }
}

fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let (sender, receiver) = sync_channel(capacity);
    let shared = Arc::new(Shared { error: Mutex::new(None) });
    (
        PipeWriter { sender, shared: Arc::clone(&shared) },
        PipeReader { receiver, shared, pending: Vec::new(), pending_pos: 0 },
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Read;

    #[test]
    fn writer_entity_streams_producer_output() {
        let pool = WriterPool::new(WorkerPoolConfig::default());
        let mut reader = pool.spawn(|w| {
            w.write_all(b"hello ")?;
            w.write_all(b"world")?;
            Ok(())
        });
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn overflow_worker_runs_jobs_with_no_core_threads() {
        let config = WorkerPoolConfig {
            core_pool_size: 0,
            max_pool_size: 2,
            keep_alive: Duration::from_millis(50),
            queue_size: 4,
            show_rejected_warning: false,
        };
        let pool = WriterPool::new(config);
        let mut reader = pool.spawn(|w| w.write_all(b"overflow"));
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "overflow");
    }

    #[test]
    fn writer_error_surfaces_to_reader() {
        let pool = WriterPool::new(WorkerPoolConfig::default());
        let mut reader = pool.spawn(|_w| Err(io::Error::new(io::ErrorKind::Other, "boom")));
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
