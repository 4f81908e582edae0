use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn spawner(policy: BatchPolicy) -> BurstSpawner {
    let mut s = BurstSpawner::new(
        BurstConfig {
            count: 40,
            duration: ms(1000),
            policy,
            ..BurstConfig::default()
        },
        3,
    )
    .unwrap();
    s.start(ms(0));
    s
}

fn at() -> Point {
    Point::new(400.0, 300.0)
}

#[test]
fn rejects_bad_configuration() {
    let bad = [
        BurstConfig {
            count: 0,
            ..BurstConfig::default()
        },
        BurstConfig {
            duration: Duration::ZERO,
            ..BurstConfig::default()
        },
        BurstConfig {
            palette: Vec::new(),
            ..BurstConfig::default()
        },
        BurstConfig {
            spread: -1.0,
            ..BurstConfig::default()
        },
    ];
    for cfg in bad {
        assert!(BurstSpawner::new(cfg, 0).is_err());
    }
}

#[test]
fn config_reads_kind_policy_and_palette() {
    let cfg: BurstConfig = serde_json::from_str(
        r##"{ "kind": "tile", "policy": "layer", "palette": ["#ffffff"], "duration": 1500 }"##,
    )
    .unwrap();
    assert_eq!(cfg.kind, BurstKind::Tile);
    assert_eq!(cfg.policy, BatchPolicy::Layer);
    assert_eq!(cfg.palette, vec![Rgba8::rgb(255, 255, 255)]);
    assert_eq!(cfg.duration, ms(1500));
    assert_eq!(cfg.count, 60);
}

#[test]
fn batch_lives_for_exactly_its_duration() {
    let mut s = spawner(BatchPolicy::Replace);
    let mut pool = ParticlePool::with_capacity(256);

    let id = s.spawn(ms(0), at(), &mut pool).unwrap();
    assert_eq!(pool.len(), 40);
    assert_eq!(pool.batch_len(id), 40);

    s.advance(ms(500), &mut pool);
    assert_eq!(pool.len(), 40);
    s.advance(ms(999), &mut pool);
    assert_eq!(pool.len(), 40);

    s.advance(ms(1001), &mut pool);
    assert_eq!(pool.len(), 0);
    assert!(s.live_batches().is_empty());
}

#[test]
fn retrigger_replaces_and_cancels_the_stale_cleanup() {
    let mut s = spawner(BatchPolicy::Replace);
    let mut pool = ParticlePool::with_capacity(256);

    let first = s.spawn(ms(0), at(), &mut pool).unwrap();
    let stale = s.cleanup_timer(first).unwrap();
    let second = s.spawn(ms(800), at(), &mut pool).unwrap();

    assert_eq!(pool.batch_len(first), 0);
    assert_eq!(pool.batch_len(second), 40);
    assert_eq!(s.live_batches(), vec![second]);

    // The first batch's deadline passes without touching the newer one.
    assert!(!s.fire(stale, &mut pool));
    s.advance(ms(1001), &mut pool);
    assert_eq!(pool.batch_len(second), 40);

    s.advance(ms(1800), &mut pool);
    assert!(pool.is_empty());
}

#[test]
fn layered_batches_expire_independently() {
    let mut s = spawner(BatchPolicy::Layer);
    let mut pool = ParticlePool::with_capacity(256);

    let first = s.spawn(ms(0), at(), &mut pool).unwrap();
    let second = s.spawn(ms(600), at(), &mut pool).unwrap();
    assert_eq!(pool.len(), 80);

    s.advance(ms(1000), &mut pool);
    assert_eq!(pool.batch_len(first), 0);
    assert_eq!(pool.batch_len(second), 40);

    s.advance(ms(1600), &mut pool);
    assert!(pool.is_empty());
}

#[test]
fn burst_that_does_not_fit_is_dropped_whole() {
    let mut s = spawner(BatchPolicy::Layer);
    let mut pool = ParticlePool::with_capacity(60);
    assert!(s.spawn(ms(0), at(), &mut pool).is_some());
    assert!(s.spawn(ms(10), at(), &mut pool).is_none());
    assert_eq!(pool.len(), 40);
    assert_eq!(s.live_batches().len(), 1);
}

#[test]
fn forced_cleanup_removes_its_batch_once() {
    let mut s = spawner(BatchPolicy::Replace);
    let mut pool = ParticlePool::with_capacity(256);
    let id = s.spawn(ms(0), at(), &mut pool).unwrap();
    let timer = s.cleanup_timer(id).unwrap();
    assert!(s.fire(timer, &mut pool));
    assert!(pool.is_empty());
    assert!(!s.fire(timer, &mut pool));
}

#[test]
fn teardown_makes_triggers_and_cleanups_no_ops() {
    let mut s = spawner(BatchPolicy::Replace);
    let mut pool = ParticlePool::with_capacity(256);
    let id = s.spawn(ms(0), at(), &mut pool).unwrap();
    let timer = s.cleanup_timer(id).unwrap();

    s.teardown();
    assert!(!s.is_running());
    assert!(!s.fire(timer, &mut pool));
    assert!(s.spawn(ms(10), at(), &mut pool).is_none());
    assert_eq!(s.live_batches(), vec![id]);
    s.advance(ms(5000), &mut pool);
    assert!(pool.is_empty());
    assert!(s.live_batches().is_empty());
    s.stop();
}

#[test]
fn restart_keeps_old_batches_on_their_deadline() {
    let mut s = spawner(BatchPolicy::Layer);
    let mut pool = ParticlePool::with_capacity(256);
    let first = s.spawn(ms(0), at(), &mut pool).unwrap();

    s.stop();
    assert_eq!(s.cleanup_timer(first), None);
    s.start(ms(100));
    assert!(s.cleanup_timer(first).is_some());

    let second = s.spawn(ms(100), at(), &mut pool).unwrap();
    assert_eq!(pool.len(), 80);

    s.advance(ms(1000), &mut pool);
    assert_eq!(pool.batch_len(first), 0);
    assert_eq!(pool.batch_len(second), 40);

    s.advance(ms(1100), &mut pool);
    assert!(pool.is_empty());
}

#[test]
fn replace_after_restart_clears_the_batch_spawned_before_stop() {
    let mut s = spawner(BatchPolicy::Replace);
    let mut pool = ParticlePool::with_capacity(256);
    let first = s.spawn(ms(0), at(), &mut pool).unwrap();

    s.stop();
    s.start(ms(100));
    let second = s.spawn(ms(100), at(), &mut pool).unwrap();

    assert_eq!(pool.batch_len(first), 0);
    assert_eq!(pool.len(), 40);
    assert_eq!(s.live_batches(), vec![second]);

    s.advance(ms(100_000), &mut pool);
    assert!(pool.is_empty());
}

#[test]
fn not_started_spawner_ignores_triggers() {
    let mut s = BurstSpawner::new(BurstConfig::default(), 0).unwrap();
    let mut pool = ParticlePool::with_capacity(256);
    assert!(s.spawn(ms(0), at(), &mut pool).is_none());
    assert!(pool.is_empty());
}

#[test]
fn confetti_falls_and_fades_out() {
    let mut s = spawner(BatchPolicy::Replace);
    let mut pool = ParticlePool::with_capacity(256);
    s.spawn(ms(0), at(), &mut pool).unwrap();

    let start: Vec<_> = pool.snapshots(ms(0)).collect();
    assert!(start.iter().all(|p| p.x == 400.0 && p.y == 300.0));
    assert!(start.iter().all(|p| p.kind == ParticleKind::Confetti));

    let mid: Vec<_> = pool.snapshots(ms(500)).collect();
    assert!(mid.iter().all(|p| p.y > 300.0));
    assert!(mid.iter().all(|p| p.opacity < 1.0));
    assert!(mid.iter().all(|p| s.config().palette.contains(&p.color)));

    assert_eq!(pool.snapshots(ms(1000)).count(), 0);
}

#[test]
fn tiles_settle_into_a_grid_in_stagger_order() {
    let mut s = BurstSpawner::new(
        BurstConfig {
            kind: BurstKind::Tile,
            count: 9,
            duration: ms(2000),
            stagger: ms(100),
            ..BurstConfig::default()
        },
        5,
    )
    .unwrap();
    s.start(ms(0));
    let mut pool = ParticlePool::with_capacity(64);
    s.spawn(ms(0), at(), &mut pool).unwrap();

    // Before its delay a tile is still invisible; the first tile has begun fading in.
    let early: Vec<_> = pool.snapshots(ms(50)).collect();
    assert!(early[0].opacity > 0.0);
    assert_eq!(early[8].opacity, 0.0);

    // Settle takes a quarter of the lifetime; everything rests by 800 + 500 ms.
    let settled: Vec<_> = pool.snapshots(ms(1400)).collect();
    assert!(settled.iter().all(|p| p.opacity == 1.0));
    let xs: Vec<f64> = settled.iter().map(|p| p.x).collect();
    assert!((xs[0] - xs[2] + 24.0).abs() < 1e-9);
    assert!((settled[4].x - 400.0).abs() < 1e-9);
    assert!((settled[4].y - 300.0).abs() < 1e-9);
}
