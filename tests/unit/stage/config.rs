use super::*;
use std::time::Duration;

#[test]
fn empty_document_is_the_default_stage() {
    let cfg = StageConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, StageConfig::default());
    assert_eq!(cfg.pool_capacity, 1024);
    assert!(cfg.typist.is_none() && cfg.star_field.is_none() && cfg.boot.is_none());
    cfg.validate().unwrap();
}

#[test]
fn sections_pick_up_their_defaults() {
    let cfg = StageConfig::from_json_str(
        r#"{
            "viewport": { "width": 800, "height": 600 },
            "seed": 9,
            "typist": { "phrases": ["a", "b"] },
            "star_field": {},
            "burst": { "count": 30 },
            "unlock": {}
        }"#,
    )
    .unwrap();
    cfg.validate().unwrap();
    let typist = cfg.typist.as_ref().unwrap();
    assert_eq!(typist.speed, Duration::from_millis(85));
    assert_eq!(cfg.star_field.as_ref().unwrap().count, 200);
    let unlock = cfg.unlock.as_ref().unwrap();
    assert_eq!(unlock.sequence.len(), 10);
    assert!(unlock.burst_at_center);
    assert_eq!(cfg.unlock_burst().unwrap().count, 30);
}

#[test]
fn unlock_burst_falls_back_to_defaults() {
    let cfg = StageConfig::from_json_str(r#"{ "unlock": { "sequence": ["x"] } }"#).unwrap();
    assert_eq!(cfg.unlock_burst().unwrap(), BurstConfig::default());
    assert!(StageConfig::default().unlock_burst().is_none());
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = StageConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, FxError::Config(_)));
    let err = StageConfig::from_json_str(r#"{ "typist": { "phrases": ["a"], "speed": -5 } }"#)
        .unwrap_err();
    assert!(matches!(err, FxError::Config(_)));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = StageConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, FxError::Config(_)));
}

#[test]
fn validation_checks_sections_and_pool_fit() {
    let mut cfg = StageConfig {
        pool_capacity: 250,
        star_field: Some(StarFieldConfig::default()),
        burst: Some(BurstConfig::default()),
        ..StageConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(FxError::Validation(_))));
    cfg.pool_capacity = 260;
    cfg.validate().unwrap();

    // The unlock burst falls back to the click burst and both can be live at once.
    cfg.unlock = Some(UnlockConfig::default());
    assert!(cfg.validate().is_err());
    cfg.pool_capacity = 320;
    cfg.validate().unwrap();
    cfg.unlock = None;

    cfg.typist = Some(TypistConfig::new(Vec::<String>::new()));
    assert!(cfg.validate().is_err());
    cfg.typist = None;

    cfg.unlock = Some(UnlockConfig {
        sequence: Vec::new(),
        ..UnlockConfig::default()
    });
    assert!(cfg.validate().is_err());
    cfg.unlock = None;

    cfg.viewport = Viewport::new(-1.0, 10.0);
    assert!(cfg.validate().is_err());
    cfg.viewport = Viewport::new(0.0, 0.0);
    cfg.validate().unwrap();

    cfg.pool_capacity = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn round_trips_through_json() {
    let cfg = StageConfig {
        seed: 42,
        typist: Some(TypistConfig::new(["Problem Solver"])),
        boot: Some(BootConfig::new(["> ready"])),
        unlock: Some(UnlockConfig::default()),
        ..StageConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(StageConfig::from_json_str(&json).unwrap(), cfg);
}
