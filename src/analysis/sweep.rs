//! Parallel parameter sweep over the `(a, t_b, m)` grid
//!
//! Grid points `(a, t_b)` are dispatched to a fixed pool of worker threads one
//! `a` row at a time over a bounded job queue. Every worker opens its own
//! integral handle once and evaluates all modes of a point before sending the
//! point back. The first error cancels the whole sweep.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use super::iteration::{modal_composite, perform_iteration};
use super::SweepOptions;
use crate::error::{ConfigError, FsmError, FsmResult};
use crate::integrals::{IntegralLookup, IntegralSource};
use crate::math::GoverningRule;
use crate::model::StripModel;
use crate::results::GridPointResult;

/// Evenly spaced samples from `start` to `stop` inclusive
///
/// The sample count is `round((stop - start) / step + 1)`, so a step that does
/// not divide the range is adjusted to the nearest one that does.
pub fn linspace(name: &str, start: f64, stop: f64, step: f64) -> Result<Vec<f64>, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidSearchSpace {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
        return Err(invalid("bounds and step must be finite"));
    }
    if step <= 0.0 {
        return Err(invalid("step must be positive"));
    }
    if stop < start {
        return Err(invalid("stop must not be less than start"));
    }

    let count = ((stop - start) / step + 1.0).round() as usize;
    if count <= 1 {
        return Ok(vec![start]);
    }

    let delta = (stop - start) / (count - 1) as f64;
    Ok((0..count)
        .map(|i| if i == count - 1 { stop } else { start + i as f64 * delta })
        .collect())
}

/// The sampled values of strip length, base thickness and mode
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    pub a: Vec<f64>,
    pub t_b: Vec<f64>,
    pub m: Vec<u32>,
}

impl SearchSpace {
    /// Create a search space from explicit samples
    pub fn new(a: Vec<f64>, t_b: Vec<f64>, m: Vec<u32>) -> Result<Self, ConfigError> {
        let invalid = |name: &str, reason: &str| ConfigError::InvalidSearchSpace {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        for (name, values) in [("a", &a), ("t_b", &t_b)] {
            if values.is_empty() {
                return Err(invalid(name, "no samples"));
            }
            if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(invalid(name, "samples must be positive"));
            }
        }
        if m.is_empty() {
            return Err(invalid("m", "no samples"));
        }
        if m.contains(&0) {
            return Err(invalid("m", "modes start at 1"));
        }

        Ok(Self { a, t_b, m })
    }

    /// Create a search space from `[start, stop, step]` ranges
    ///
    /// Mode samples are truncated to integers.
    pub fn from_ranges(a: [f64; 3], t_b: [f64; 3], m: [f64; 3]) -> Result<Self, ConfigError> {
        let a = linspace("a", a[0], a[1], a[2])?;
        let t_b = linspace("t_b", t_b[0], t_b[1], t_b[2])?;
        let modes = linspace("m", m[0], m[1], m[2])?;

        if modes.iter().any(|&v| v < 1.0) {
            return Err(ConfigError::InvalidSearchSpace {
                name: "m".to_string(),
                reason: "modes start at 1".to_string(),
            });
        }

        Self::new(a, t_b, modes.into_iter().map(|v| v as u32).collect())
    }

    /// Number of `(a, t_b)` grid points
    pub fn grid_size(&self) -> usize {
        self.a.len() * self.t_b.len()
    }

    /// Number of `(a, t_b, m)` evaluations
    pub fn evaluation_count(&self) -> usize {
        self.grid_size() * self.m.len()
    }

    /// `(a, t_b)` of the grid point with row-major `index`
    pub fn point(&self, index: usize) -> (f64, f64) {
        let row = self.t_b.len();
        (self.a[index / row], self.t_b[index % row])
    }
}

/// One `a` row of the grid
struct Job {
    row: usize,
}

/// What a worker owns for its whole lifetime
struct WorkerContext<H> {
    id: usize,
    handle: H,
    model: Arc<StripModel>,
    space: Arc<SearchSpace>,
    rule: GoverningRule,
    cancel: Arc<AtomicBool>,
}

impl<H: IntegralLookup> WorkerContext<H> {
    fn evaluate(&self, index: usize) -> FsmResult<GridPointResult> {
        let (a, t_b) = self.space.point(index);

        let raw = self
            .space
            .m
            .iter()
            .map(|&m| perform_iteration(&self.model, &self.handle, a, t_b, m, self.rule))
            .collect::<FsmResult<Vec<_>>>()?;

        let composite = modal_composite(&raw).ok_or_else(|| ConfigError::InvalidSearchSpace {
            name: "m".to_string(),
            reason: "no samples".to_string(),
        })?;

        log::debug!("worker {}: a={} t_b={} -> m_dominant={}", self.id, a, t_b, composite.m_dominant);

        Ok(GridPointResult {
            index,
            a,
            t_b,
            raw,
            composite,
        })
    }

    fn run(self, jobs: Receiver<Job>, results: Sender<FsmResult<GridPointResult>>) {
        let row_len = self.space.t_b.len();

        'jobs: for job in jobs.iter() {
            for index in job.row * row_len..(job.row + 1) * row_len {
                if self.cancel.load(Ordering::Relaxed) {
                    break 'jobs;
                }

                let outcome = self.evaluate(index);
                if outcome.is_err() {
                    self.cancel.store(true, Ordering::Relaxed);
                }
                if results.send(outcome).is_err() {
                    break 'jobs;
                }
            }
        }

        log::debug!("worker {} stopped", self.id);
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_worker<S>(
    id: usize,
    source: Arc<S>,
    model: Arc<StripModel>,
    space: Arc<SearchSpace>,
    options: &SweepOptions,
    cancel: Arc<AtomicBool>,
    jobs: Receiver<Job>,
    results: Sender<FsmResult<GridPointResult>>,
) -> FsmResult<JoinHandle<()>>
where
    S: IntegralSource + 'static,
{
    let rule = options.governing;

    let worker = thread::Builder::new()
        .name(format!("fsm-worker-{}", id))
        .spawn(move || {
            let handle = match source.open() {
                Ok(handle) => handle,
                Err(e) => {
                    log::error!("worker {} could not open the integral store: {}", id, e);
                    cancel.store(true, Ordering::Relaxed);
                    let _ = results.send(Err(e));
                    return;
                }
            };
            log::debug!("worker {} started", id);

            let context = WorkerContext {
                id,
                handle,
                model,
                space,
                rule,
                cancel,
            };
            context.run(jobs, results);
        })?;

    Ok(worker)
}

/// A running sweep
///
/// Iterating yields one [`GridPointResult`] per `(a, t_b)` in row-major
/// order. After an error is yielded the iterator ends. Dropping the sweep
/// cancels outstanding work and joins all threads.
pub struct Sweep {
    results: Option<Receiver<FsmResult<GridPointResult>>>,
    cancel: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
    pending: BTreeMap<usize, GridPointResult>,
    next_index: usize,
    received: usize,
    total: usize,
    finished: bool,
}

/// Start a sweep of `model` over `space`
///
/// # Arguments
/// * `space` - Sampled `a`, `t_b` and `m`
/// * `model` - Strip model shared by all workers
/// * `source` - Integral store, opened once per worker
/// * `options` - Pool size, governing rule and queue capacity
pub fn sweep<S>(space: &SearchSpace, model: Arc<StripModel>, source: S, options: &SweepOptions) -> FsmResult<Sweep>
where
    S: IntegralSource + 'static,
{
    let source = Arc::new(source);
    let space = Arc::new(space.clone());
    let workers = options.workers.max(1);
    let total = space.grid_size();
    let rows = space.a.len();

    log::info!(
        "Starting sweep: {} grid points x {} modes on {} workers",
        total,
        space.m.len(),
        workers
    );

    let cancel = Arc::new(AtomicBool::new(false));
    let (job_tx, job_rx) = bounded::<Job>(options.channel_capacity.max(1));
    let (result_tx, result_rx) = bounded(options.channel_capacity.max(1) * space.t_b.len());

    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
        let spawned = spawn_worker(
            id,
            Arc::clone(&source),
            Arc::clone(&model),
            Arc::clone(&space),
            options,
            Arc::clone(&cancel),
            job_rx.clone(),
            result_tx.clone(),
        );
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                cancel.store(true, Ordering::Relaxed);
                drop(job_tx);
                drop(result_rx);
                for handle in handles {
                    let _ = handle.join();
                }
                return Err(e);
            }
        }
    }
    drop(job_rx);
    drop(result_tx);

    let dispatch_cancel = Arc::clone(&cancel);
    let dispatcher = thread::Builder::new()
        .name("fsm-dispatcher".to_string())
        .spawn(move || {
            for row in 0..rows {
                if dispatch_cancel.load(Ordering::Relaxed) || job_tx.send(Job { row }).is_err() {
                    break;
                }
            }
        });

    let mut sweep = Sweep {
        results: Some(result_rx),
        cancel,
        workers: handles,
        dispatcher: None,
        pending: BTreeMap::new(),
        next_index: 0,
        received: 0,
        total,
        finished: false,
    };

    match dispatcher {
        Ok(dispatcher) => {
            sweep.dispatcher = Some(dispatcher);
            Ok(sweep)
        }
        // dropping the sweep shuts the workers down
        Err(e) => Err(e.into()),
    }
}

impl Sweep {
    /// Number of grid points in the sweep
    pub fn total(&self) -> usize {
        self.total
    }

    /// Next result in the order workers complete them
    ///
    /// Points already buffered for ordered iteration are returned first.
    pub fn next_completed(&mut self) -> Option<FsmResult<GridPointResult>> {
        if self.finished {
            return None;
        }
        if let Some((_, point)) = self.pending.pop_first() {
            return Some(Ok(point));
        }
        if self.received == self.total {
            self.shutdown();
            return None;
        }

        match self.receive() {
            Ok(point) => Some(Ok(point)),
            Err(e) => {
                self.shutdown();
                Some(Err(e))
            }
        }
    }

    fn receive(&mut self) -> FsmResult<GridPointResult> {
        let received = match &self.results {
            Some(results) => results.recv(),
            None => return Err(FsmError::WorkerPanicked),
        };

        match received {
            Ok(Ok(point)) => {
                self.received += 1;
                Ok(point)
            }
            Ok(Err(e)) => {
                log::warn!("Sweep cancelled: {}", e);
                Err(e)
            }
            // every worker exited before all points arrived
            Err(_) => Err(FsmError::WorkerPanicked),
        }
    }

    /// Cancel, close the channels and join every thread
    fn shutdown(&mut self) {
        if self.received < self.total {
            self.cancel.store(true, Ordering::Relaxed);
        }
        self.finished = true;
        self.results = None;

        let mut panicked = false;
        for handle in self.workers.drain(..) {
            panicked |= handle.join().is_err();
        }
        if let Some(dispatcher) = self.dispatcher.take() {
            panicked |= dispatcher.join().is_err();
        }
        if panicked {
            log::error!("A sweep thread panicked");
        }

        if self.received == self.total {
            log::info!("Sweep finished: {} grid points", self.total);
        }
    }
}

impl Iterator for Sweep {
    type Item = FsmResult<GridPointResult>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if let Some(point) = self.pending.remove(&self.next_index) {
                self.next_index += 1;
                return Some(Ok(point));
            }
            if self.received == self.total {
                self.shutdown();
                return None;
            }

            match self.receive() {
                Ok(point) => {
                    self.pending.insert(point.index, point);
                }
                Err(e) => {
                    self.shutdown();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl Drop for Sweep {
    fn drop(&mut self) {
        if !self.finished {
            self.shutdown();
        }
    }
}
