use super::*;

#[test]
fn wire_field_names_parse() {
    let u = SlideUpdate::from_json_str(
        r#"{
            "image": "aGVsbG8=",
            "text": [{"content": "Hello", "x": 10, "y": 20, "fontSize": 32, "font": "Arial"}],
            "text-color": "black",
            "transition-effect": "pixel",
            "transition-time": 5
        }"#,
    )
    .unwrap();
    assert_eq!(u.image, "aGVsbG8=");
    assert_eq!(u.text_color, "black");
    assert_eq!(u.transition_effect, TransitionEffect::Pixel);
    assert_eq!(u.transition_time, 5);
    assert_eq!(
        u.text,
        vec![TextElement {
            content: "Hello".to_owned(),
            x: 10,
            y: 20,
            font_size: Some(32),
            font: Some("Arial".to_owned()),
        }]
    );
}

#[test]
fn missing_fields_take_client_defaults() {
    let u = SlideUpdate::from_json_str(r#"{"image": ""}"#).unwrap();
    assert_eq!(u.text_color, "white");
    assert_eq!(u.transition_effect, TransitionEffect::Fade);
    assert!(u.text.is_empty());
    assert!(!u.has_image());
    assert_eq!(u.image_source().unwrap(), None);
}

#[test]
fn unknown_effect_is_fade() {
    assert_eq!(TransitionEffect::parse("dissolve"), TransitionEffect::Fade);
    assert_eq!(TransitionEffect::parse(" PIXEL "), TransitionEffect::Pixel);
    assert_eq!(TransitionEffect::parse("slide"), TransitionEffect::Slide);

    let u = SlideUpdate::from_json_str(r#"{"transition-effect": "spin"}"#).unwrap();
    assert_eq!(u.transition_effect, TransitionEffect::Fade);
}

#[test]
fn effect_serializes_lowercase() {
    let json = serde_json::to_string(&TransitionEffect::Pixel).unwrap();
    assert_eq!(json, "\"pixel\"");
    assert_eq!(TransitionEffect::Slide.as_str(), "slide");
}

#[test]
fn transition_time_is_tenths_of_a_second() {
    let mut u = SlideUpdate::default();
    u.transition_time = 5;
    assert_eq!(u.transition_duration(), Duration::from_millis(500));
    u.transition_time = 0;
    assert_eq!(u.transition_duration(), Duration::from_millis(2000));
    u.transition_time = -3;
    assert_eq!(u.transition_duration(), Duration::from_millis(2000));
}

#[test]
fn bare_base64_image_becomes_jpeg_data_uri() {
    let u = SlideUpdate {
        image: "AAAA".to_owned(),
        ..SlideUpdate::default()
    };
    assert_eq!(
        u.image_source().unwrap(),
        Some(ImageSource::DataUri("data:image/jpeg;base64,AAAA".to_owned()))
    );
}

#[test]
fn list_accepts_array_or_single_object() {
    let many = SlideUpdate::list_from_json_str(r#"[{"image": "a"}, {"image": "b"}]"#).unwrap();
    assert_eq!(many.len(), 2);
    assert_eq!(many[1].image, "b");

    let one = SlideUpdate::list_from_json_str(r#"{"image": "c"}"#).unwrap();
    assert_eq!(one.len(), 1);

    let err = SlideUpdate::list_from_json_str("42").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}
