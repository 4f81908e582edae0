use super::*;
use std::time::Duration;

#[test]
fn viewport_renderable_requires_positive_finite_extents() {
    assert!(Viewport::new(800.0, 600.0).is_renderable());
    assert!(!Viewport::new(0.0, 600.0).is_renderable());
    assert!(!Viewport::new(800.0, -1.0).is_renderable());
    assert!(!Viewport::new(f64::NAN, 600.0).is_renderable());
    assert!(!Viewport::new(f64::INFINITY, 600.0).is_renderable());
    assert_eq!(Viewport::new(800.0, 600.0).center(), Point::new(400.0, 300.0));
}

#[test]
fn hex_colours_parse_with_and_without_alpha() {
    assert_eq!(
        Rgba8::parse_hex("#00E5A5").unwrap(),
        Rgba8::rgb(0x00, 0xe5, 0xa5)
    );
    assert_eq!(
        Rgba8::parse_hex("a0d2ffbf").unwrap(),
        Rgba8::rgba(0xa0, 0xd2, 0xff, 0xbf)
    );
    assert!(Rgba8::parse_hex("#123").is_err());
    assert!(Rgba8::parse_hex("#zzzzzz").is_err());
    assert!(Rgba8::parse_hex("#ééé").is_err());
}

#[test]
fn colour_serde_uses_hex_and_accepts_arrays() {
    let c = Rgba8::rgba(1, 2, 3, 4);
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#01020304\"");
    let back: Rgba8 = serde_json::from_str("\"#01020304\"").unwrap();
    assert_eq!(back, c);
    let arr: Rgba8 = serde_json::from_str("[10, 20, 30]").unwrap();
    assert_eq!(arr, Rgba8::rgb(10, 20, 30));
    assert!(serde_json::from_str::<Rgba8>("[1, 2]").is_err());
}

#[test]
fn with_alpha_f_clamps() {
    assert_eq!(Rgba8::rgb(1, 1, 1).with_alpha_f(0.75).a, 191);
    assert_eq!(Rgba8::rgb(1, 1, 1).with_alpha_f(7.0).a, 255);
    assert_eq!(Rgba8::rgb(1, 1, 1).with_alpha_f(-1.0).a, 0);
}

#[test]
fn millisecond_durations_are_exact() {
    assert_eq!(duration_from_ms(600.0).unwrap(), Duration::from_millis(600));
    assert_eq!(duration_from_ms(42.5).unwrap(), Duration::from_micros(42_500));
    assert!(duration_from_ms(-1.0).is_err());
    assert!(duration_from_ms(f64::NAN).is_err());
    assert_eq!(as_ms(Duration::from_millis(85)), 85.0);
}

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
struct Timed {
    #[serde(with = "serde_ms")]
    d: Duration,
}

#[test]
fn serde_ms_writes_whole_and_fractional_millis() {
    let whole = Timed {
        d: Duration::from_millis(85),
    };
    assert_eq!(serde_json::to_string(&whole).unwrap(), r#"{"d":85}"#);
    let half = Timed {
        d: Duration::from_micros(42_500),
    };
    assert_eq!(serde_json::to_string(&half).unwrap(), r#"{"d":42.5}"#);
    let back: Timed = serde_json::from_str(r#"{"d":42.5}"#).unwrap();
    assert_eq!(back, half);
    assert!(serde_json::from_str::<Timed>(r#"{"d":-3}"#).is_err());
}

#[test]
fn spans_validate_and_serialize_as_pairs() {
    let s: Span = serde_json::from_str("[0.2, 1.5]").unwrap();
    assert_eq!(s, Span::new(0.2, 1.5));
    assert_eq!(serde_json::to_string(&s).unwrap(), "[0.2,1.5]");
    assert!(s.validate("radius").is_ok());
    assert!(Span::new(2.0, 1.0).validate("radius").is_err());
    assert!(Span::new(0.0, f64::NAN).validate("radius").is_err());

    let mut rng = crate::foundation::rng::Rng64::new(1);
    let v = s.sample(&mut rng);
    assert!((0.2..1.5).contains(&v));
}
