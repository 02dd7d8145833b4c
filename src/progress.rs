use async_channel::{Receiver, Sender};
use log::error;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

/// Counts finished rows. Workers bump the counter, and every `step` rows
/// the new count is sent to whoever displays it. Only used for feedback.
pub struct Progress {
    done: AtomicUsize,
    total: usize,
    step: usize,
    sender: Sender<usize>,
}

impl Progress {
    /// A counter for `total` rows that reports roughly `updates` times.
    pub fn new(total: usize, updates: usize) -> (Progress, Receiver<usize>) {
        let (sender, receiver) = async_channel::unbounded();
        let step = (total / updates.max(1)).max(1);
        let progress = Progress {
            done: AtomicUsize::new(0),
            total,
            step,
            sender,
        };
        (progress, receiver)
    }
    pub fn row_done(&self) {
        let n = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if n % self.step == 0 || n == self.total {
            // Nobody listening is fine.
            let _ = self.sender.try_send(n);
        }
    }
    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Print updates on stderr until the `Progress` sending them is dropped.
pub fn spawn_reporter(receiver: Receiver<usize>, total: usize) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut stderr = std::io::stderr();
        let mut last = 0;
        while let Ok(n) = receiver.recv_blocking() {
            // Updates from different workers may arrive out of order.
            if n <= last {
                continue;
            }
            last = n;
            let _ = write!(
                stderr,
                "\rrendering: {:3}% ({}/{} rows)",
                n * 100 / total.max(1),
                n,
                total
            );
            let _ = stderr.flush();
        }
        if last > 0 {
            let _ = writeln!(stderr);
        }
    })
}

/// Wait for the reporter to finish. A panic in it is logged, not propagated.
pub fn join_reporter(reporter: JoinHandle<()>) -> bool {
    match reporter.join() {
        Ok(()) => true,
        Err(_) => {
            error!("the progress reporter panicked");
            false
        }
    }
}
