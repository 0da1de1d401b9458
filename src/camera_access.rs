//! Camera permission gate.
//!
//! Capture actions requested before the platform has answered the permission
//! prompt are queued, then run (granted) or dropped (denied) when the answer
//! arrives through [`CameraAccess::on_permission_result`].

use std::collections::VecDeque;
use parking_lot::Mutex;

pub type CaptureAction = Box<dyn FnOnce() + Send>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    #[default] Undetermined,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Ran,
    Queued,
    Rejected,
}

#[derive(Default)]
struct GateState {
    status: PermissionStatus,
    pending: VecDeque<CaptureAction>,
    flushing: bool,
}

#[derive(Default)]
pub struct CameraAccess {
    state: Mutex<GateState>,
}

impl CameraAccess {
    pub fn new(status: PermissionStatus) -> Self {
        Self {
            state: Mutex::new(GateState {
                status,
                pending: VecDeque::new(),
                flushing: false,
            }),
        }
    }

    pub fn status(&self) -> PermissionStatus {
        self.state.lock().status
    }

    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// While queued captures are being replayed, new requests join the back
    /// of the queue so they still run after everything requested earlier.
    pub fn request_capture<F>(&self, action: F) -> CaptureOutcome
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock();
        match state.status {
            PermissionStatus::Granted if !state.flushing => {
                drop(state);
                action();
                CaptureOutcome::Ran
            }
            PermissionStatus::Granted | PermissionStatus::Undetermined => {
                state.pending.push_back(Box::new(action));
                CaptureOutcome::Queued
            }
            PermissionStatus::Denied => {
                log::warn!("Camera permission denied, capture request ignored");
                CaptureOutcome::Rejected
            }
        }
    }

    /// Records the platform's answer. Returns how many queued actions this
    /// call ran; a grant that arrives while another call is already replaying
    /// the queue leaves the replay to that call.
    pub fn on_permission_result(&self, granted: bool) -> usize {
        let mut state = self.state.lock();
        if !granted {
            state.status = PermissionStatus::Denied;
            let dropped = std::mem::take(&mut state.pending);
            if !dropped.is_empty() {
                log::warn!("Camera permission denied, dropping {} queued capture(s)", dropped.len());
            }
            return 0;
        }

        state.status = PermissionStatus::Granted;
        if state.flushing {
            return 0;
        }
        state.flushing = true;
        log::info!("Camera permission granted, running {} queued capture(s)", state.pending.len());

        let mut ran = 0;
        loop {
            if state.status != PermissionStatus::Granted || state.pending.is_empty() {
                state.flushing = false;
                return ran;
            }
            let batch = std::mem::take(&mut state.pending);
            drop(state);

            for action in batch {
                action();
                ran += 1;
            }
            state = self.state.lock();
        }
    }
}

impl std::fmt::Debug for CameraAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CameraAccess")
            .field("status", &state.status)
            .field("pending", &state.pending.len())
            .finish()
    }
}
