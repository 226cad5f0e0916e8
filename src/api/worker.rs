use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use super::{Outcome, Request, TaskApi, execute};

/// Runs requests on a background thread so the event loop never waits on
/// the network. Outcomes come back in completion order.
pub struct Gateway {
    requests: Sender<Request>,
    outcomes: Receiver<Outcome>,
    in_flight: usize,
}

impl Gateway {
    /// Start the worker thread. The thread owns `api` and exits once the
    /// gateway is dropped and the current request finishes.
    pub fn spawn<A>(api: A) -> io::Result<Self>
    where
        A: TaskApi + Send + 'static,
    {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (out_tx, out_rx) = mpsc::channel::<Outcome>();

        thread::Builder::new()
            .name("todoey-gateway".into())
            .spawn(move || {
                for request in req_rx {
                    let outcome = execute(&api, request);
                    if out_tx.send(outcome).is_err() {
                        break;
                    }
                }
                tracing::debug!("gateway worker exiting");
            })?;

        Ok(Gateway {
            requests: req_tx,
            outcomes: out_rx,
            in_flight: 0,
        })
    }

    /// Queue a request. Returns false if the worker is gone.
    pub fn submit(&mut self, request: Request) -> bool {
        match self.requests.send(request) {
            Ok(()) => {
                self.in_flight += 1;
                true
            }
            Err(_) => {
                tracing::error!("gateway worker is not running");
                false
            }
        }
    }

    /// Collect every outcome that has arrived, without blocking.
    pub fn drain(&mut self) -> Vec<Outcome> {
        let mut ready = Vec::new();
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    ready.push(outcome);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        ready
    }

    /// Block up to `timeout` for the next outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<Outcome> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(outcome)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Requests submitted whose outcome has not been collected yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
