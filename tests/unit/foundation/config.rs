use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = TransitionConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, TransitionConfig::default());
    assert_eq!(cfg.block_size, 32);
    assert_eq!(cfg.default_duration(), Duration::from_millis(1500));
}

#[test]
fn partial_json_overrides_fields() {
    let cfg = TransitionConfig::from_json_str(r#"{ "block_size": 16, "seed": 9 }"#).unwrap();
    assert_eq!(cfg.block_size, 16);
    assert_eq!(cfg.seed, Some(9));
    assert_eq!(cfg.diagonal_bias, 0.3);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(TransitionConfig::from_json_str(r#"{ "block_size": 0 }"#).is_err());
    assert!(TransitionConfig::from_json_str(r#"{ "diagonal_bias": 1.5 }"#).is_err());
    assert!(
        TransitionConfig::from_json_str(r#"{ "block_size": 2, "border_inset": 2 }"#).is_err()
    );
    let err = TransitionConfig::from_json_str("[1, 2]").unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn border_color_is_premultiplied() {
    let cfg = TransitionConfig::default();
    assert_eq!(cfg.border_color().to_array(), [128, 128, 128, 128]);
}

#[test]
fn missing_config_file_reports_path() {
    let err = TransitionConfig::from_json_file(Path::new("definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("here.json"));
}
