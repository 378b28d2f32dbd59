use super::*;

#[derive(Debug, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    tactile: Vec<TactileBinding>,
    #[serde(default)]
    joystick: Vec<AxisBinding>,
}

#[test]
fn tetris_map_resolves_every_builtin_control() {
    let map = ControlMap::tetris();
    let expected = [
        (65, "Left"),
        (68, "Right"),
        (81, "z"),
        (69, "Up"),
        (67, "c"),
        (83, "Down"),
    ];
    for (code, action) in expected {
        let resolved = map
            .resolve(&ControlKey::Tactile { code })
            .expect("tactile mapped");
        assert_eq!(resolved.as_str(), action);
    }
    assert_eq!(map.len(), 10);
}

#[test]
fn joystick_axis_resolves_by_direction() {
    let map = ControlMap::tetris();
    let axis = |axis, direction| ControlKey::Joystick { axis, direction };

    assert_eq!(
        map.resolve(&axis(0, AxisDirection::Positive)).expect("0+").as_str(),
        "Right"
    );
    assert_eq!(
        map.resolve(&axis(0, AxisDirection::Negative)).expect("0-").as_str(),
        "Left"
    );
    assert_eq!(
        map.resolve(&axis(1, AxisDirection::Positive)).expect("1+").as_str(),
        "Down"
    );
    assert_eq!(
        map.resolve(&axis(1, AxisDirection::Negative)).expect("1-").as_str(),
        "c"
    );
}

#[test]
fn unmapped_control_fails_with_its_key() {
    let map = ControlMap::tetris();
    let key = ControlKey::Tactile { code: 90 };
    let err = map.resolve(&key).expect_err("code 90 is unmapped");
    assert_eq!(err.key, key);
    assert_eq!(err.to_string(), "no action mapped for tactile 90");

    let key = ControlKey::Joystick {
        axis: 2,
        direction: AxisDirection::Negative,
    };
    let err = map.resolve(&key).expect_err("axis 2 is unmapped");
    assert_eq!(err.to_string(), "no action mapped for joystick axis 2 (-)");
}

#[test]
fn direction_of_zero_or_nan_is_undefined() {
    assert_eq!(AxisDirection::of(0.3), Some(AxisDirection::Positive));
    assert_eq!(AxisDirection::of(-0.3), Some(AxisDirection::Negative));
    assert_eq!(AxisDirection::of(0.0), None);
    assert_eq!(AxisDirection::of(-0.0), None);
    assert_eq!(AxisDirection::of(f64::NAN), None);
}

#[test]
fn bindings_from_toml_build_equivalent_map() {
    let file: BindingsFile = toml::from_str(
        r#"
        [[tactile]]
        code = 65
        action = "Left"

        [[joystick]]
        axis = 0
        positive = "Right"
        negative = "Left"
        "#,
    )
    .expect("parse bindings");

    let map = ControlMap::from_bindings(&file.tactile, &file.joystick).expect("valid bindings");
    assert_eq!(
        map,
        ControlMap::new()
            .with_tactile(65, "Left")
            .with_axis(0, "Right", "Left")
    );
}

#[test]
fn duplicate_binding_is_rejected() {
    let tactile = vec![
        TactileBinding {
            code: 65,
            action: "Left".into(),
        },
        TactileBinding {
            code: 65,
            action: "Right".into(),
        },
    ];
    let err = ControlMap::from_bindings(&tactile, &[]).expect_err("duplicate");
    assert_eq!(
        err,
        MappingError::DuplicateBinding(ControlKey::Tactile { code: 65 })
    );
}

#[test]
fn blank_action_is_rejected() {
    let joystick = vec![AxisBinding {
        axis: 1,
        positive: "Down".into(),
        negative: "  ".into(),
    }];
    let err = ControlMap::from_bindings(&[], &joystick).expect_err("blank");
    assert!(matches!(err, MappingError::EmptyAction(ControlKey::Joystick { axis: 1, .. })));
}
