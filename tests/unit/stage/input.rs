use super::*;

#[test]
fn events_are_tagged_by_type() {
    let e: InputEvent = serde_json::from_str(r#"{ "type": "click", "x": 1.5, "y": 2 }"#).unwrap();
    assert_eq!(e, InputEvent::Click { x: 1.5, y: 2.0 });
    let e: InputEvent = serde_json::from_str(r#"{ "type": "key", "code": "ArrowUp" }"#).unwrap();
    assert_eq!(
        e,
        InputEvent::Key {
            code: "ArrowUp".to_owned()
        }
    );
    assert!(serde_json::from_str::<InputEvent>(r#"{ "type": "scroll" }"#).is_err());
}

#[test]
fn scripts_are_sorted_by_arrival() {
    let script = parse_script(
        r#"[
            { "at_ms": 500, "type": "key", "code": "a" },
            { "at_ms": 100, "type": "resize", "width": 640, "height": 480 },
            { "at_ms": 500, "type": "key", "code": "b" }
        ]"#,
    )
    .unwrap();
    assert_eq!(script.len(), 3);
    assert_eq!(script[0].at().unwrap(), Duration::from_millis(100));
    assert_eq!(
        script[2].event,
        InputEvent::Key {
            code: "b".to_owned()
        }
    );
}

#[test]
fn negative_times_are_rejected() {
    assert!(parse_script(r#"[{ "at_ms": -1, "type": "click", "x": 0, "y": 0 }]"#).is_err());
    assert!(parse_script("{}").is_err());
}
