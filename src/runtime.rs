use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvError, Sender};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

/// Unified event type consumed by the background loop
#[derive(Clone, Debug)]
pub enum TimerEvent {
    /// A decoded request object from the command channel
    Request(Value),
    /// One second elapsed
    Tick,
    /// The command channel closed; time to shut down
    Closed,
}

/// Source of timer events (requests, ticks, shutdown)
pub trait EventSource: Send + 'static {
    /// Block until the next event arrives.
    fn recv(&self) -> Result<TimerEvent, RecvError>;
}

/// Production event source merging a once-per-second ticker thread with a
/// stdin reader thread into one sequential stream. Commands never
/// interleave with ticks below one-event granularity.
pub struct StdinEventSource {
    rx: Receiver<TimerEvent>,
}

impl StdinEventSource {
    pub fn new(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        spawn_ticker(tx.clone(), tick_interval);

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Value>(&line) {
                    Ok(value) => {
                        if tx.send(TimerEvent::Request(value)).is_err() {
                            return;
                        }
                    }
                    Err(e) => debug!("dropping malformed request: {e}"),
                }
            }
            let _ = tx.send(TimerEvent::Closed);
        });

        Self { rx }
    }
}

fn spawn_ticker(tx: Sender<TimerEvent>, interval: Duration) {
    std::thread::spawn(move || loop {
        std::thread::sleep(interval);
        if tx.send(TimerEvent::Tick).is_err() {
            break;
        }
    });
}

impl EventSource for StdinEventSource {
    fn recv(&self) -> Result<TimerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Test event source for unit and integration tests
pub struct TestEventSource {
    rx: Receiver<TimerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TimerEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv(&self) -> Result<TimerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Runner that advances the background loop one event at a time
pub struct Runner<E: EventSource> {
    source: E,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E) -> Self {
        Self { source }
    }

    /// Blocks for the next event; a disconnected source reads as Closed.
    pub fn step(&self) -> TimerEvent {
        self.source.recv().unwrap_or(TimerEvent::Closed)
    }
}
