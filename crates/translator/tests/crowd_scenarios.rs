use shared::{
    domain::ControlKind,
    protocol::{JoystickSample, Progress, Report, TactileSample},
};
use translator::{Action, Translator};

fn single_tactile(code: u32, down_mean: f64) -> Report {
    Report {
        tactile: vec![TactileSample { code, down_mean }],
        joystick: Vec::new(),
    }
}

#[test]
fn strong_left_press_fires_left() {
    let translation = Translator::default()
        .translate(&single_tactile(65, 0.95))
        .expect("translate");

    assert_eq!(translation.actions, vec![Action::new("Left")]);
    assert_eq!(
        translation.feedback,
        vec![Progress {
            target: ControlKind::Tactile,
            code: 65,
            progress: 0.999,
        }]
    );
}

#[test]
fn weak_right_press_fires_nothing() {
    let translation = Translator::default()
        .translate(&single_tactile(68, 0.5))
        .expect("translate");

    assert!(translation.actions.is_empty());
    assert_eq!(
        translation.feedback,
        vec![Progress {
            target: ControlKind::Tactile,
            code: 68,
            progress: 0.0,
        }]
    );
}

#[test]
fn joystick_up_swaps_hold() {
    let report = Report {
        tactile: Vec::new(),
        joystick: vec![JoystickSample {
            axis: 1,
            info_mean: -0.9,
        }],
    };
    let translation = Translator::default().translate(&report).expect("translate");

    assert_eq!(translation.actions, vec![Action::new("c")]);
    assert_eq!(
        translation.feedback,
        vec![Progress {
            target: ControlKind::Joystick,
            code: 1,
            progress: 0.999,
        }]
    );
}

#[test]
fn mixed_report_below_threshold_reports_two_zeroes() {
    let report = Report {
        tactile: vec![TactileSample {
            code: 81,
            down_mean: 0.3,
        }],
        joystick: vec![JoystickSample {
            axis: 0,
            info_mean: -0.4,
        }],
    };
    let translation = Translator::default().translate(&report).expect("translate");

    assert!(translation.actions.is_empty());
    assert_eq!(translation.feedback.len(), 2);
    assert!(translation.feedback.iter().all(|p| p.progress == 0.0));
}
