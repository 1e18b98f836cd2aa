//! Batch-and-yield scheduling
//!
//! Long-running phases are written as steppers that do one unit of work per
//! call. [`Batch`] counts units and signals when a yield point is due; the
//! caller decides what yielding means by supplying a future for each yield
//! point. [`run_batched`] is executor-agnostic: it only awaits the futures
//! it is handed, so an already-ready future makes it run straight through.

use core::future::Future;

/// Result of a single unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Progress,
    Done,
}

/// Answer from a yield point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// How a batched run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Complete,
    /// A yield point answered [`Flow::Stop`] before the work finished.
    Aborted,
}

/// Counts work units and reports when `size` of them have been processed.
#[derive(Clone, Debug)]
pub struct Batch {
    size: usize,
    done: usize,
}

impl Batch {
    /// A batch size of 0 is treated as 1.
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            done: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Record one unit; `true` when the batch is full and a yield is due.
    pub fn tick(&mut self) -> bool {
        self.done += 1;
        if self.done >= self.size {
            self.done = 0;
            true
        } else {
            false
        }
    }
}

/// Run `step` until it reports [`Step::Done`], awaiting `yield_point`
/// after every `batch_size` units of progress.
pub async fn run_batched<W, Y, F>(batch_size: usize, mut step: W, mut yield_point: Y) -> RunStatus
where
    W: FnMut() -> Step,
    Y: FnMut() -> F,
    F: Future<Output = Flow>,
{
    let mut batch = Batch::new(batch_size);
    loop {
        if step() == Step::Done {
            return RunStatus::Complete;
        }
        if batch.tick() && yield_point().await == Flow::Stop {
            return RunStatus::Aborted;
        }
    }
}

/// Poll a future to completion on the current thread.
///
/// Only meant for futures that never wait on an external wakeup.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(fut: F) -> F::Output {
    use core::pin::pin;
    use core::ptr;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn raw() -> RawWaker {
        RawWaker::new(ptr::null(), &VTABLE)
    }
    fn clone(_: *const ()) -> RawWaker {
        raw()
    }
    fn noop(_: *const ()) {}
    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

    // SAFETY: every vtable entry ignores the data pointer
    let waker = unsafe { Waker::from_raw(raw()) };
    let mut cx = Context::from_waker(&waker);
    let mut fut = pin!(fut);
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
    }
}
