use super::core::{ProcessingStats, Record, RecordOutcome, SequenceProcessor};
use anyhow::{anyhow, bail, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// A worker's answer for one record. `Err` carries the panic payload.
type WorkerResult = (u64, thread::Result<RecordOutcome>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Running,
    Draining,
    Done,
}

/// Fixed-size slot table that releases outcomes strictly in index order.
pub struct ReorderBuffer {
    slots: Vec<Option<RecordOutcome>>,
    next: u64,
}

impl ReorderBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity.max(1)).map(|_| None).collect(),
            next: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the next outcome to be released.
    pub fn next_index(&self) -> u64 {
        self.next
    }

    pub fn insert(&mut self, index: u64, outcome: RecordOutcome) -> Result<()> {
        let cap = self.capacity() as u64;
        if index < self.next || index - self.next >= cap {
            bail!(
                "Result {} is outside the reorder window [{}, {})",
                index,
                self.next,
                self.next + cap
            );
        }
        let slot = &mut self.slots[(index % cap) as usize];
        if slot.is_some() {
            bail!("Duplicate result for record {}", index);
        }
        *slot = Some(outcome);
        Ok(())
    }

    pub fn pop_next(&mut self) -> Option<RecordOutcome> {
        let cap = self.capacity() as u64;
        let pos = (self.next % cap) as usize;
        let outcome = self.slots[pos].take()?;
        self.next += 1;
        Some(outcome)
    }
}

/// Fans records out to a fixed pool of workers and hands outcomes back in input order.
pub struct Dispatcher<P: SequenceProcessor> {
    processor: P,
    num_threads: usize,
    in_flight: usize,
    state: DispatchState,
}

impl<P: SequenceProcessor> Dispatcher<P> {
    pub fn new(processor: P, num_threads: usize, in_flight: usize) -> Self {
        let num_threads = num_threads.max(1);
        Self {
            processor,
            num_threads,
            in_flight: in_flight.max(num_threads),
            state: DispatchState::Idle,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    fn transition(&mut self, next: DispatchState) {
        debug!("Dispatcher {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Processes every record from `input` and passes each outcome to `sink` in input order.
    ///
    /// An `Err` from the input or the sink aborts the run; records already dispatched are
    /// discarded.
    pub fn run<I, F>(&mut self, input: I, mut sink: F) -> Result<ProcessingStats>
    where
        I: IntoIterator<Item = Result<Record>>,
        F: FnMut(&RecordOutcome) -> Result<()>,
    {
        if self.state != DispatchState::Idle {
            bail!("Dispatcher has already been run");
        }
        self.transition(DispatchState::Running);

        let mut stats = ProcessingStats::default();
        let mut emit = |outcome: RecordOutcome| -> Result<()> {
            match &outcome {
                Ok(output) => stats.record_output(output),
                Err(rejection) => {
                    warn!("{}", rejection);
                    stats.rejected += 1;
                }
            }
            sink(&outcome)
        };

        let result = if self.num_threads <= 1 {
            self.run_single_thread(input, &mut emit)
        } else {
            self.run_with_threads(input, &mut emit)
        };
        drop(emit);

        self.transition(DispatchState::Done);
        result.map(|()| stats)
    }

    fn run_single_thread<I, E>(&mut self, input: I, emit: &mut E) -> Result<()>
    where
        I: IntoIterator<Item = Result<Record>>,
        E: FnMut(RecordOutcome) -> Result<()>,
    {
        for (index, record) in input.into_iter().enumerate() {
            emit(self.processor.process_sequence(index as u64, record?))?;
        }
        self.transition(DispatchState::Draining);
        Ok(())
    }

    fn run_with_threads<I, E>(&mut self, input: I, emit: &mut E) -> Result<()>
    where
        I: IntoIterator<Item = Result<Record>>,
        E: FnMut(RecordOutcome) -> Result<()>,
    {
        let (job_tx, job_rx) = bounded::<(u64, Record)>(self.in_flight);
        let (result_tx, result_rx) = bounded::<WorkerResult>(self.in_flight);
        let handles = self.spawn_workers(job_rx, result_tx);

        let outcome = self.pump(input, job_tx, &result_rx, emit);

        // Workers exit once the job channel is closed; the result channel holds every
        // outstanding outcome, so none of them can block on send.
        let mut panicked = false;
        for handle in handles {
            if handle.join().is_err() {
                panicked = true;
            }
        }
        if panicked {
            return Err(anyhow!("A worker thread panicked"));
        }
        outcome
    }

    fn spawn_workers(
        &self,
        job_rx: Receiver<(u64, Record)>,
        result_tx: Sender<WorkerResult>,
    ) -> Vec<thread::JoinHandle<()>> {
        let mut handles = Vec::with_capacity(self.num_threads);
        for _ in 0..self.num_threads {
            let rx = job_rx.clone();
            let tx = result_tx.clone();
            let worker_processor = self.processor.clone();
            let handle = thread::spawn(move || {
                while let Ok((index, record)) = rx.recv() {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        worker_processor.process_sequence(index, record)
                    }));
                    let failed = outcome.is_err();
                    if tx.send((index, outcome)).is_err() || failed {
                        break;
                    }
                }
            });
            handles.push(handle);
        }
        handles
    }

    /// Keeps at most `in_flight` records between dispatch and emission.
    fn pump<I, E>(
        &mut self,
        input: I,
        job_tx: Sender<(u64, Record)>,
        result_rx: &Receiver<WorkerResult>,
        emit: &mut E,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Result<Record>>,
        E: FnMut(RecordOutcome) -> Result<()>,
    {
        let mut input = input.into_iter();
        let mut reorder = ReorderBuffer::new(self.in_flight);
        let mut job_tx = Some(job_tx);
        let mut dispatched: u64 = 0;

        loop {
            while dispatched - reorder.next_index() < self.in_flight as u64 {
                let Some(tx) = &job_tx else { break };
                match input.next() {
                    Some(record) => {
                        tx.send((dispatched, record?))
                            .map_err(|_| anyhow!("All workers have exited"))?;
                        dispatched += 1;
                    }
                    None => {
                        job_tx = None;
                        self.transition(DispatchState::Draining);
                    }
                }
            }

            if reorder.next_index() == dispatched && job_tx.is_none() {
                return Ok(());
            }

            let (index, outcome) = result_rx.recv().map_err(|_| {
                anyhow!(
                    "Workers exited with {} records outstanding",
                    dispatched - reorder.next_index()
                )
            })?;
            let outcome = outcome.map_err(|payload| {
                anyhow!(
                    "Worker panicked on record {}: {}",
                    index,
                    panic_message(payload.as_ref())
                )
            })?;
            reorder.insert(index, outcome)?;
            while let Some(outcome) = reorder.pop_next() {
                emit(outcome)?;
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}
