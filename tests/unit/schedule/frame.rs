use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn frames_are_only_delivered_while_running() {
    let mut fl = FrameLoop::default();
    assert!(fl.on_frame(ms(0)).is_none());

    fl.start();
    assert!(fl.has_pending());
    let first = fl.on_frame(ms(10)).unwrap();
    assert!(fl.has_pending());
    assert_eq!(first.index, 0);
    assert_eq!(first.delta, Duration::ZERO);

    let second = fl.on_frame(ms(26)).unwrap();
    assert_eq!(second.index, 1);
    assert_eq!(second.delta, ms(16));

    fl.stop();
    assert!(!fl.has_pending());
    assert!(fl.on_frame(ms(42)).is_none());
}

#[test]
fn start_and_stop_are_idempotent() {
    let mut fl = FrameLoop::default();
    fl.start();
    fl.start();
    assert!(fl.on_frame(ms(0)).is_some());
    fl.stop();
    fl.stop();
    assert!(!fl.is_running());
}

#[test]
fn delta_is_clamped_and_reset_on_restart() {
    let mut fl = FrameLoop::new(ms(100));
    fl.start();
    fl.on_frame(ms(0)).unwrap();
    let long = fl.on_frame(ms(5_000)).unwrap();
    assert_eq!(long.delta, ms(100));

    fl.stop();
    fl.start();
    let resumed = fl.on_frame(ms(9_000)).unwrap();
    assert_eq!(resumed.delta, Duration::ZERO);
    assert_eq!(resumed.index, 2);
}

#[test]
fn reference_frames_is_one_at_sixty_hertz() {
    let tick = FrameTick {
        index: 0,
        now: Duration::ZERO,
        delta: REFERENCE_FRAME,
    };
    assert!((tick.reference_frames() - 1.0).abs() < 1e-9);
}
