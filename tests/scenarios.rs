// End-to-end runs over scripted displays

use maxrate::test_utils::{mode, Call, FakeDisplays};
use maxrate::*;

fn run_all(service: &FakeDisplays, options: &RunOptions) -> Vec<DeviceReport> {
    let mut reports = Vec::new();
    run(service, options, |report| {
        reports.push(report);
        Ok::<_, std::io::Error>(())
    })
    .unwrap();
    reports
}

#[test]
fn raises_display_to_its_fastest_mode() {
    let service = FakeDisplays::default().with_device("DISPLAY1", &[60, 75, 120, 144], Some(60));

    let reports = run_all(&service, &RunOptions::default());

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].max_refresh_rate, RefreshRate(144));
    assert_eq!(reports[0].modes, 4);
    assert_eq!(reports[0].outcome, ChangeOutcome::Applied { previous: RefreshRate(60) });

    // the request is the active mode, not one of the enumerated modes
    assert_eq!(
        service.applied(),
        vec![("DISPLAY1".to_string(), mode("DISPLAY1", 144), ApplyFlags::Persist)]
    );
}

#[test]
fn apply_request_keeps_display_flags_and_field_mask() {
    let service = FakeDisplays::default().with_device("DISPLAY1", &[60, 144], Some(60));
    let active = mode("DISPLAY1", 60);
    assert_ne!(active.display_flags, 0);

    run_all(&service, &RunOptions::default());

    let applied = service.applied();
    let requested = &applied[0].1;
    assert_eq!(requested.display_flags, active.display_flags);
    assert_eq!(requested.fields, active.fields);
    assert_eq!(requested.resolution, active.resolution);
    assert_eq!(requested.orientation, active.orientation);
    assert_eq!(requested.fixed_output, active.fixed_output);
    assert_eq!(requested.bits_per_pixel, active.bits_per_pixel);
    assert_eq!(requested.position, active.position);
}

#[test]
fn leaves_display_already_at_maximum() {
    let service = FakeDisplays::default().with_device("DISPLAY2", &[120], Some(120));

    let reports = run_all(&service, &RunOptions::default());

    assert_eq!(reports[0].max_refresh_rate, RefreshRate(120));
    assert_eq!(reports[0].outcome, ChangeOutcome::AlreadyAtTarget { current: RefreshRate(120) });
    assert!(service.applied().is_empty());
}

#[test]
fn retrieval_failure_moves_on_to_next_display() {
    let service = FakeDisplays::default()
        .with_device("DISPLAY3", &[60, 144], None)
        .with_device("DISPLAY4", &[60, 165], Some(60));

    let reports = run_all(&service, &RunOptions::default());

    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].outcome, ChangeOutcome::RetrievalFailed { .. }));
    assert_eq!(reports[1].outcome, ChangeOutcome::Applied { previous: RefreshRate(60) });

    let applied = service.applied();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].0, "DISPLAY4");
}

#[test]
fn rejected_change_is_reported_and_not_retried() {
    let service = FakeDisplays::default()
        .with_device("DISPLAY1", &[60, 144], Some(60))
        .with_device("DISPLAY2", &[120], Some(120))
        .apply_status(ApplyStatus::Failed);

    let reports = run_all(&service, &RunOptions::default());

    assert_eq!(
        reports[0].outcome,
        ChangeOutcome::Failed {
            previous: RefreshRate(60),
            status: ApplyStatus::Failed
        }
    );
    assert_eq!(reports[1].outcome, ChangeOutcome::AlreadyAtTarget { current: RefreshRate(120) });
    assert_eq!(service.applied().len(), 1);
}

#[test]
fn displays_are_processed_in_enumeration_order() {
    let service = FakeDisplays::default()
        .with_device("DISPLAY1", &[60, 144], Some(60))
        .with_device("DISPLAY2", &[120], Some(120))
        .with_device("DISPLAY3", &[60], None);

    let reports = run_all(&service, &RunOptions::default());

    let order: Vec<(u32, &str)> = reports
        .iter()
        .map(|report| (report.index, report.device.name.as_str()))
        .collect();
    assert_eq!(order, vec![(0, "DISPLAY1"), (1, "DISPLAY2"), (2, "DISPLAY3")]);

    let calls = service.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::CurrentMode("DISPLAY1".to_string()));
    assert!(matches!(&calls[1], Call::Apply(device, _, _) if device == "DISPLAY1"));
    assert_eq!(calls[2], Call::CurrentMode("DISPLAY2".to_string()));
    assert_eq!(calls[3], Call::CurrentMode("DISPLAY3".to_string()));
}

#[test]
fn display_without_modes_attempts_zero() {
    let service = FakeDisplays::default()
        .with_device("DISPLAY1", &[], Some(60))
        .apply_status(ApplyStatus::BadMode);

    let reports = run_all(&service, &RunOptions::default());

    assert_eq!(reports[0].max_refresh_rate, RefreshRate(0));
    assert_eq!(reports[0].modes, 0);
    assert_eq!(
        reports[0].outcome,
        ChangeOutcome::Failed {
            previous: RefreshRate(60),
            status: ApplyStatus::BadMode
        }
    );
}

#[test]
fn looser_tolerance_accepts_nearby_rate() {
    let service = FakeDisplays::default().with_device("DISPLAY1", &[60, 144], Some(140));
    let options = RunOptions {
        tolerance: "0.05".parse().unwrap(),
        ..RunOptions::default()
    };

    let reports = run_all(&service, &options);

    assert_eq!(reports[0].outcome, ChangeOutcome::AlreadyAtTarget { current: RefreshRate(140) });
    assert!(service.applied().is_empty());
}

#[test]
fn text_output_for_a_full_run() {
    let service = FakeDisplays::default()
        .with_device("DISPLAY1", &[60, 75, 120, 144], Some(60))
        .with_device("DISPLAY2", &[120], Some(120))
        .with_device("DISPLAY3", &[60], None);

    let mut out = Vec::new();
    write_text_header(&mut out).unwrap();
    run(&service, &RunOptions::default(), |report| write_text(&mut out, &report)).unwrap();

    let expected = "Available Monitors and their Refresh Rates:\n\
        \n\
        Monitor 1: DISPLAY1 - Fake Adapter DISPLAY1\n\
        Maximum refresh rate for DISPLAY1 is 144Hz.\n\
        \n\
        The current refresh rate is 60Hz, adjusting to 144Hz.\n\
        Refresh rate successfully changed to 144Hz.\n\
        \n\
        Monitor 2: DISPLAY2 - Fake Adapter DISPLAY2\n\
        Maximum refresh rate for DISPLAY2 is 120Hz.\n\
        \n\
        The monitor is already set to the target refresh rate: 120Hz (current 120Hz).\n\
        \n\
        Monitor 3: DISPLAY3 - Fake Adapter DISPLAY3\n\
        Maximum refresh rate for DISPLAY3 is 60Hz.\n\
        \n\
        Unable to retrieve display settings.\n";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}
