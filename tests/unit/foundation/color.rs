use super::*;

#[test]
fn hex_forms() {
    assert_eq!(parse_color("#fff").unwrap(), Color::WHITE);
    assert_eq!(parse_color("#0F172A").unwrap(), Color::rgb(15, 23, 42));
    assert_eq!(parse_color("#00000080").unwrap(), Color::rgba(0, 0, 0, 128));
    assert_eq!(parse_color(" #f008 ").unwrap(), Color::rgba(255, 0, 0, 136));
    assert!(parse_color("#12345").is_err());
    assert!(parse_color("#zzzzzz").is_err());
}

#[test]
fn rgb_functions_and_names() {
    assert_eq!(
        parse_color("rgb(10, 20, 30)").unwrap(),
        Color::rgb(10, 20, 30)
    );
    assert_eq!(
        parse_color("rgba(255,255,255,0.5)").unwrap(),
        Color::rgba(255, 255, 255, 128)
    );
    assert_eq!(
        parse_color("rgb(100% 0% 0% / 50%)").unwrap(),
        Color::rgba(255, 0, 0, 128)
    );
    assert_eq!(parse_color("White").unwrap(), Color::WHITE);
    assert!(parse_color("chartreuse-ish").is_err());
}

#[test]
fn solid_fill() {
    assert_eq!(
        Fill::parse("#112233").as_solid(),
        Some(Color::rgb(0x11, 0x22, 0x33))
    );
}

#[test]
fn linear_gradient_with_angle_and_positions() {
    let fill = Fill::parse("linear-gradient(135deg, #000000 0%, #ffffff 100%)");
    let Fill::LinearGradient { angle_deg, stops } = fill else {
        panic!("expected gradient");
    };
    assert_eq!(angle_deg, 135.0);
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].offset, 0.0);
    assert_eq!(stops[1].offset, 1.0);
    let mid = Fill::sample(&stops, 0.5);
    assert!((i16::from(mid.r) - 128).abs() <= 1);
}

#[test]
fn gradient_defaults_and_sides() {
    let Fill::LinearGradient { angle_deg, stops } =
        Fill::parse("linear-gradient(to right, rgba(0,0,0,1), #f00, #00f)")
    else {
        panic!("expected gradient");
    };
    assert_eq!(angle_deg, 90.0);
    assert_eq!(stops.len(), 3);
    assert_eq!(stops[1].offset, 0.5);

    let Fill::LinearGradient { angle_deg, .. } = Fill::parse("linear-gradient(#000, #fff)") else {
        panic!("expected gradient");
    };
    assert_eq!(angle_deg, 180.0);
}

#[test]
fn unknown_expressions_are_kept_verbatim() {
    let fill = Fill::parse("radial-gradient(circle, #000, #fff)");
    assert_eq!(
        fill,
        Fill::Unsupported {
            css: "radial-gradient(circle, #000, #fff)".to_owned()
        }
    );
    assert!(matches!(
        Fill::parse("linear-gradient(#000)"),
        Fill::Unsupported { .. }
    ));
}
