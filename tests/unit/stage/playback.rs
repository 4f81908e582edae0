use super::*;
use crate::{
    effects::burst::BurstConfig,
    foundation::core::Viewport,
    render::surface::RecordingSurface,
    stage::{
        config::{StageConfig, UnlockConfig},
        input::parse_script,
    },
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn clock_rejects_nonsense_rates() {
    assert!(FrameClock::from_fps(0.0).is_err());
    assert!(FrameClock::from_fps(-30.0).is_err());
    assert!(FrameClock::from_fps(f64::NAN).is_err());
    assert_eq!(
        FrameClock::from_fps(60.0).unwrap().interval(),
        Duration::from_nanos(16_666_667)
    );
}

#[test]
fn clock_times_include_both_ends() {
    let clock = FrameClock::from_fps(10.0).unwrap();
    let times: Vec<_> = clock.times(ms(300)).collect();
    assert_eq!(times, vec![ms(0), ms(100), ms(200), ms(300)]);
    assert_eq!(clock.times(Duration::ZERO).count(), 1);
}

#[test]
fn script_inputs_land_before_their_frame() {
    let stage = Stage::new(StageConfig {
        burst: Some(BurstConfig {
            count: 4,
            duration: ms(250),
            ..BurstConfig::default()
        }),
        unlock: Some(UnlockConfig {
            sequence: vec!["a".to_owned(), "b".to_owned()],
            ..UnlockConfig::default()
        }),
        ..StageConfig::default()
    })
    .unwrap();
    let script = parse_script(
        r#"[
            { "at_ms": 150, "type": "click", "x": 10, "y": 10 },
            { "at_ms": 420, "type": "key", "code": "a" },
            { "at_ms": 430, "type": "key", "code": "b" },
            { "at_ms": 450, "type": "resize", "width": 200, "height": 100 }
        ]"#,
    )
    .unwrap();

    let mut rec = RecordingSurface::new();
    let stats = run_script(stage, &script, ms(1000), FrameClock::from_fps(10.0).unwrap(), &mut rec)
        .unwrap();

    assert_eq!(stats.frames, 11);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.inputs, 4);
    assert_eq!(stats.bursts, 2);

    let frames = rec.frames();
    assert_eq!(frames[1].particles.len(), 0);
    assert_eq!(frames[2].particles.len(), 4);
    assert_eq!(frames[4].particles.len(), 0);
    assert_eq!(frames[5].particles.len(), 4);
    assert_eq!(frames[5].unlocks, 1);
    assert_eq!(frames[5].viewport, Viewport::new(200.0, 100.0));
    assert_eq!(frames[7].particles.len(), 0);
}
