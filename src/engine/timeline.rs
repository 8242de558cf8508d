// Virtual clock for running the engine without a browser.
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::{CueSource, Presenter, Scheduler, SequenceEngine, Timer, dispatch};
use crate::error::AdapterError;

#[derive(Debug)]
struct Pending {
    due_ms: u64,
    seq: u64,
    timer: Timer,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the BinaryHeap pops the earliest (then oldest) timer first.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deterministic [`Scheduler`] over virtual milliseconds.
///
/// Timers fire in due order, ties in the order they were scheduled. Time only
/// moves when a timer is popped or [`Timeline::advance_by`] is called.
#[derive(Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    next_seq: u64,
    pending: BinaryHeap<Pending>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending timer, moving the clock to its due time.
    pub fn pop_due(&mut self) -> Option<Timer> {
        let next = self.pending.pop()?;
        self.now_ms = self.now_ms.max(next.due_ms);
        Some(next.timer)
    }

    /// Fire every timer due within the next `ms`, then settle the clock at
    /// `now + ms`.
    pub fn advance_by<S, P>(&mut self, ms: u64, engine: &mut SequenceEngine<S>, presenter: &mut P) -> Result<(), AdapterError>
    where
        S: CueSource,
        P: Presenter + ?Sized,
    {
        let until = self.now_ms + ms;
        while self.pending.peek().is_some_and(|p| p.due_ms <= until) {
            if let Some(timer) = self.pop_due() {
                let commands = engine.fire(timer);
                dispatch(commands, presenter, self)?;
            }
        }
        self.now_ms = until;
        Ok(())
    }

    /// Fire timers until none are left. The game then waits on the player or
    /// has ended.
    pub fn drain<S, P>(&mut self, engine: &mut SequenceEngine<S>, presenter: &mut P) -> Result<(), AdapterError>
    where
        S: CueSource,
        P: Presenter + ?Sized,
    {
        while let Some(timer) = self.pop_due() {
            let commands = engine.fire(timer);
            dispatch(commands, presenter, self)?;
        }
        Ok(())
    }
}

impl Scheduler for Timeline {
    fn schedule(&mut self, delay_ms: u32, timer: Timer) -> Result<(), AdapterError> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + u64::from(delay_ms),
            seq,
            timer,
        });
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<(), AdapterError> {
        self.pending.clear();
        Ok(())
    }
}
