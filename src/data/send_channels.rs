use crossbeam_channel::{Receiver, Sender};
use crate::common::{Classification, PokeImage};
use crate::error::ClassifyError;

/// Identity of one submitted frame. Later submissions get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

#[derive(Debug)]
pub struct ClassifyRequest {
    pub token: RequestToken,
    pub frame: PokeImage,
}

#[derive(Debug)]
pub struct ClassifyResponse {
    pub token: RequestToken,
    pub result: Result<Classification, ClassifyError>,
}

/// Worker side of the service channels.
#[derive(Debug)]
pub struct WorkerState {
    pub req_rx: Receiver<ClassifyRequest>,
    pub res_tx: Sender<ClassifyResponse>,
}

/// Caller side of the service channels.
#[derive(Debug)]
pub struct SendState {
    pub req_tx: Sender<ClassifyRequest>,
    pub res_rx: Receiver<ClassifyResponse>,
}

pub fn service_channels() -> (SendState, WorkerState) {
    let (req_tx, req_rx) = crossbeam_channel::unbounded();
    let (res_tx, res_rx) = crossbeam_channel::unbounded();
    (SendState { req_tx, res_rx }, WorkerState { req_rx, res_tx })
}
