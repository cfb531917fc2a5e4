use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::bounded;
use rayon::prelude::*;

use crate::chunk::{Chunk, Chunks};
use crate::config::{Config, Dispatch};
use crate::error::Error;
use crate::reduce::{reduce, Measurements};
use crate::source::SourceRegion;
use crate::worker::{PartialMap, Worker};

/// Opens and aggregates the file at `path`.
pub fn aggregate_path(path: impl AsRef<Path>, config: &Config) -> Result<Measurements, Error> {
    let file = File::open(path).map_err(Error::Mapping)?;
    aggregate(&file, config)
}

/// Maps `file` and aggregates its contents. The mapping is released before
/// returning, on success and on error.
pub fn aggregate(file: &File, config: &Config) -> Result<Measurements, Error> {
    let region = SourceRegion::map(file)?;
    aggregate_bytes(&region, config)
}

#[tracing::instrument(skip_all, fields(bytes = data.len(), workers = config.workers.get(), dispatch = %config.dispatch))]
pub fn aggregate_bytes(data: &[u8], config: &Config) -> Result<Measurements, Error> {
    let start = Instant::now();
    let workers = config.workers.get();
    let chunks = match config.chunk_size {
        Some(size) => Chunks::with_size(data, size.get()),
        None => Chunks::per_worker(data, workers),
    };

    let partials = match config.dispatch {
        Dispatch::Pull => pull(data, chunks, workers)?,
        Dispatch::Push => push(data, chunks, workers)?,
    };
    tracing::info!(partials = partials.len(), elapsed = ?start.elapsed(), "workers done");

    let reduce_start = Instant::now();
    let measurements = reduce(partials);
    tracing::info!(keys = measurements.len(), elapsed = ?reduce_start.elapsed(), "reduced");
    Ok(measurements)
}

/// Lowest byte offset at which any worker has failed so far. Chunks starting
/// past it are skipped; chunks starting at or before it are always finished,
/// so the first bad line of the input is the one reported.
struct FailureMark(AtomicUsize);

impl FailureMark {
    fn new() -> Self {
        FailureMark(AtomicUsize::new(usize::MAX))
    }

    fn record(&self, err: &Error) {
        self.0.fetch_min(err.offset().unwrap_or(0), Ordering::Relaxed);
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed) != usize::MAX
    }

    fn skips(&self, chunk: Chunk) -> bool {
        chunk.start > self.0.load(Ordering::Relaxed)
    }
}

/// Runs `chunks` (in ascending offset order) through one worker, stopping at
/// the first chunk past a recorded failure.
fn run_worker<'a, I>(data: &'a [u8], chunks: I, mark: &FailureMark) -> Result<PartialMap<'a>, Error>
where
    I: IntoIterator<Item = Chunk>,
{
    let mut worker = Worker::new(data);
    for chunk in chunks {
        if mark.skips(chunk) {
            break;
        }
        if let Err(err) = worker.process(chunk) {
            mark.record(&err);
            return Err(err);
        }
    }
    Ok(worker.finish())
}

/// One producer feeds chunks through a bounded queue; `workers` threads pull
/// until it is drained. Every worker is joined before any map is returned.
fn pull<'a>(data: &'a [u8], chunks: Chunks<'a>, workers: usize) -> Result<Vec<PartialMap<'a>>, Error> {
    let (sender, receiver) = bounded::<Chunk>(workers * 2);
    let mark = FailureMark::new();

    let results: Vec<Result<PartialMap<'a>, Error>> = thread::scope(|s| {
        let mark = &mark;

        s.spawn(move || {
            let mut produced = 0usize;
            for chunk in chunks {
                // Unsent chunks all lie past any chunk that already failed.
                if mark.is_set() || sender.send(chunk).is_err() {
                    break;
                }
                produced += 1;
            }
            tracing::debug!(chunks = produced, "chunk producer done");
        });

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let receiver = receiver.clone();
                s.spawn(move || run_worker(data, receiver, mark))
            })
            .collect();
        drop(receiver);

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| Err(Error::WorkerPanicked)))
            .collect()
    });

    settle(results)
}

/// Chunks are split up front into at most `workers` contiguous runs, each
/// handled by one worker on a dedicated rayon pool.
fn push<'a>(data: &'a [u8], chunks: Chunks<'a>, workers: usize) -> Result<Vec<PartialMap<'a>>, Error> {
    let chunks: Vec<Chunk> = chunks.collect();
    let per_worker = chunks.len().div_ceil(workers).max(1);
    tracing::debug!(chunks = chunks.len(), per_worker, "chunks assigned");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("brc-worker-{i}"))
        .build()?;

    let mark = FailureMark::new();
    let results: Vec<Result<PartialMap<'a>, Error>> = pool.install(|| {
        chunks
            .par_chunks(per_worker)
            .map(|run| run_worker(data, run.iter().copied(), &mark))
            .collect()
    });

    settle(results)
}

/// Returns every partial map, or the earliest error if any worker failed.
fn settle<'a>(results: Vec<Result<PartialMap<'a>, Error>>) -> Result<Vec<PartialMap<'a>>, Error> {
    let mut partials = Vec::with_capacity(results.len());
    let mut first_error: Option<Error> = None;
    for result in results {
        match result {
            Ok(partial) => partials.push(partial),
            Err(err) => first_error = Some(earliest(first_error, err)),
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(partials),
    }
}

/// Of two worker errors, keeps the one for the lower byte offset; parse
/// errors win over panics.
fn earliest(current: Option<Error>, new: Error) -> Error {
    match current {
        None => new,
        Some(current) => match (current.offset(), new.offset()) {
            (Some(a), Some(b)) if b < a => new,
            (None, Some(_)) => new,
            _ => current,
        },
    }
}
