use std::sync::Arc;
use parking_lot::Mutex;
use poke_classify::camera_access::{CameraAccess, CaptureOutcome, PermissionStatus};

fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> Box<dyn FnOnce() + Send>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_ = Arc::clone(&log);
    let make = move |id: u32| {
        let log = Arc::clone(&log_);
        Box::new(move || log.lock().push(id)) as Box<dyn FnOnce() + Send>
    };
    (log, make)
}

#[test]
fn granted_runs_immediately() {
    let access = CameraAccess::new(PermissionStatus::Granted);
    let (log, make) = recorder();

    assert_eq!(access.request_capture(make(1)), CaptureOutcome::Ran);
    assert_eq!(*log.lock(), vec![1]);
}

#[test]
fn pending_captures_run_in_order_once_granted() {
    let access = CameraAccess::default();
    let (log, make) = recorder();

    assert_eq!(access.status(), PermissionStatus::Undetermined);
    assert_eq!(access.request_capture(make(1)), CaptureOutcome::Queued);
    assert_eq!(access.request_capture(make(2)), CaptureOutcome::Queued);
    assert_eq!(access.pending(), 2);
    assert!(log.lock().is_empty());

    assert_eq!(access.on_permission_result(true), 2);
    assert_eq!(*log.lock(), vec![1, 2]);
    assert_eq!(access.pending(), 0);

    // later requests run straight away and the queue is not replayed
    assert_eq!(access.request_capture(make(3)), CaptureOutcome::Ran);
    assert_eq!(access.on_permission_result(true), 0);
    assert_eq!(*log.lock(), vec![1, 2, 3]);
}

#[test]
fn denial_drops_the_queue() {
    let access = CameraAccess::default();
    let (log, make) = recorder();

    access.request_capture(make(1));
    assert_eq!(access.on_permission_result(false), 0);
    assert_eq!(access.status(), PermissionStatus::Denied);
    assert_eq!(access.request_capture(make(2)), CaptureOutcome::Rejected);
    assert!(log.lock().is_empty());
}

#[test]
fn queued_capture_may_request_again() {
    let access = Arc::new(CameraAccess::default());
    let (log, make) = recorder();

    let inner = Arc::clone(&access);
    let follow_up = make(2);
    let first = make(1);
    access.request_capture(move || {
        first();
        assert_eq!(inner.request_capture(follow_up), CaptureOutcome::Queued);
    });

    assert_eq!(access.on_permission_result(true), 2);
    assert_eq!(*log.lock(), vec![1, 2]);
    assert_eq!(access.request_capture(make(3)), CaptureOutcome::Ran);
}

#[test]
fn request_during_replay_waits_for_earlier_captures() {
    let access = Arc::new(CameraAccess::default());
    let (log, make) = recorder();
    let (started_tx, started_rx) = crossbeam_channel::bounded::<()>(0);
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);

    let first = make(1);
    access.request_capture(move || {
        started_tx.send(()).unwrap();
        release_rx.recv().unwrap();
        first();
    });
    access.request_capture(make(2));

    let granting = Arc::clone(&access);
    let replay = std::thread::spawn(move || granting.on_permission_result(true));

    // capture 1 is running and capture 2 is still queued
    started_rx.recv().unwrap();
    assert_eq!(access.status(), PermissionStatus::Granted);
    assert_eq!(access.request_capture(make(3)), CaptureOutcome::Queued);
    // a repeated grant leaves the replay to the thread already doing it
    assert_eq!(access.on_permission_result(true), 0);
    assert!(log.lock().is_empty());

    release_tx.send(()).unwrap();
    assert_eq!(replay.join().unwrap(), 3);
    assert_eq!(*log.lock(), vec![1, 2, 3]);
    assert_eq!(access.pending(), 0);

    assert_eq!(access.request_capture(make(4)), CaptureOutcome::Ran);
    assert_eq!(*log.lock(), vec![1, 2, 3, 4]);
}
