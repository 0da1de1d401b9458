//! Background classification with per-request tokens.
//!
//! Every submitted frame gets a [`RequestToken`] from a shared generation
//! counter. Only the newest token is current: the worker skips frames that were
//! superseded before it got to them, and results for superseded frames are
//! dropped instead of being handed to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use crate::classification_runners::{InferenceEngine, PokeClassifier};
use crate::common::{Classification, PokeImage};
use crate::data::send_channels::{service_channels, ClassifyRequest, ClassifyResponse, SendState, WorkerState};
use crate::data::RequestToken;
use crate::error::ClassifyError;

pub struct ClassifyService {
    req_tx: Option<Sender<ClassifyRequest>>,
    res_rx: Receiver<ClassifyResponse>,
    generation: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl ClassifyService {
    /// Moves the classifier onto a dedicated worker thread.
    pub fn spawn<E>(classifier: PokeClassifier<E>) -> Result<Self, ClassifyError>
    where
        E: InferenceEngine + Send + 'static,
    {
        let (SendState { req_tx, res_rx }, worker_state) = service_channels();
        let generation = Arc::new(AtomicU64::new(0));

        let worker_generation = Arc::clone(&generation);
        let worker = thread::Builder::new()
            .name("poke-classify".to_string())
            .spawn(move || classify_loop(classifier, worker_state, worker_generation))
            .map_err(|err| {
                ClassifyError::EngineUnavailable(anyhow::Error::new(err).context("Failed to spawn classification worker"))
            })?;

        Ok(Self {
            req_tx: Some(req_tx),
            res_rx,
            generation,
            worker: Some(worker),
        })
    }

    /// Queues a frame and makes it the current request.
    pub fn submit(&self, frame: PokeImage) -> Result<RequestToken, ClassifyError> {
        let req_tx = self.req_tx.as_ref().ok_or(ClassifyError::ServiceClosed)?;
        let token = RequestToken(self.generation.fetch_add(1, Ordering::AcqRel) + 1);

        req_tx
            .send(ClassifyRequest { token, frame })
            .map_err(|_| ClassifyError::ServiceClosed)?;
        Ok(token)
    }

    /// Supersedes every request submitted so far.
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation.load(Ordering::Acquire)
    }

    /// Hands every ready, current result to `handler` without blocking.
    /// Returns how many results were delivered.
    pub fn dispatch<F>(&self, mut handler: F) -> usize
    where
        F: FnMut(RequestToken, Result<Classification, ClassifyError>),
    {
        let mut delivered = 0;
        for response in self.res_rx.try_iter() {
            if self.is_current(response.token) {
                handler(response.token, response.result);
                delivered += 1;
            } else {
                log::debug!("Dropping stale result for request {}", response.token.0);
            }
        }
        delivered
    }

    /// Blocks until the current request has a result, or `timeout` passes.
    /// Stale results that arrive in the meantime are dropped.
    pub fn wait_latest(&self, timeout: Duration) -> Result<Option<ClassifyResponse>, ClassifyError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.res_rx.recv_deadline(deadline) {
                Ok(response) if self.is_current(response.token) => return Ok(Some(response)),
                Ok(response) => {
                    log::debug!("Dropping stale result for request {}", response.token.0);
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(ClassifyError::ServiceClosed),
            }
        }
    }
}

impl Drop for ClassifyService {
    fn drop(&mut self) {
        self.cancel_pending();
        self.req_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Classification worker panicked");
            }
        }
    }
}

fn classify_loop<E: InferenceEngine>(
    mut classifier: PokeClassifier<E>,
    state: WorkerState,
    generation: Arc<AtomicU64>,
) {
    log::info!("Classification worker started");

    // MESSAGE LOOP: ends once every sender is gone and the queue is drained.
    for request in state.req_rx.iter() {
        let token = request.token;
        if token.0 < generation.load(Ordering::Acquire) {
            log::debug!("Skipping superseded request {}", token.0);
            continue;
        }

        let result = classifier.classify(request.frame);
        match &result {
            Ok(classification) => {
                log::debug!("Request {}: {} ({:.2}%)", token.0, classification.label, classification.percent());
            }
            Err(err) if err.is_skippable() => log::warn!("Skipping frame {}: {}", token.0, err),
            Err(err) => log::error!("Classification of request {} failed: {}", token.0, err),
        }

        if state.res_tx.send(ClassifyResponse { token, result }).is_err() {
            break;
        }
    }

    log::info!("Classification worker stopped");
}
