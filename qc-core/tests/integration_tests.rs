/*
 * Integration tests for QController
 *
 * These tests drive whole logs through parsing and evaluation and check the
 * resulting classifications.
 */

use qc_core::{
    evaluate_log, evaluate_sensors, lookup, parse_log, Label, QControllerError, ReferenceRecord,
};

const SAMPLE_LOG: &str = include_str!("fixtures/sample.log");

// Test utilities
fn log_with_reference(body: &str) -> String {
    format!("reference 70.0 45.0\n{}", body)
}

fn thermometer_log(readings: &[f64]) -> String {
    let lines: Vec<String> = readings
        .iter()
        .enumerate()
        .map(|(minute, value)| format!("2007-04-05T22:{:02} {}", minute, value))
        .collect();
    log_with_reference(&format!("thermometer temp-1\n{}\n", lines.join("\n")))
}

#[test]
fn test_sample_log_classification() {
    let report = evaluate_log(SAMPLE_LOG).unwrap();

    let pairs: Vec<(&str, Label)> = report.iter().map(|e| (e.sensor.as_str(), e.label)).collect();
    assert_eq!(
        pairs,
        vec![
            ("temp-1", Label::Precise),
            ("temp-2", Label::UltraPrecise),
            ("hum-1", Label::Keep),
            ("hum-2", Label::Discard),
            ("hum-3", Label::Keep),
        ]
    );
}

#[test]
fn test_sample_log_serializes_in_declaration_order() {
    let report = evaluate_log(SAMPLE_LOG).unwrap();
    assert_eq!(
        serde_json::to_string(&report).unwrap(),
        r#"{"temp-1":"precise","temp-2":"ultra precise","hum-1":"keep","hum-2":"discard","hum-3":"keep"}"#
    );
}

#[test]
fn test_reference_only_log() {
    let log = parse_log("reference 70.0 45.0\n").unwrap();
    assert_eq!(log.reference, ReferenceRecord::new(70.0, 45.0));
    assert_eq!(log.sensor_count(), 0);

    let report = evaluate_sensors(&log).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_empty_and_unreferenced_logs() {
    assert!(matches!(evaluate_log(""), Err(QControllerError::EmptyInput)));
    assert!(matches!(
        evaluate_log("humidistat hum-1\n2007-04-05T22:04 45.2\n"),
        Err(QControllerError::MissingReference)
    ));
}

#[test]
fn test_thermometer_sample_is_deterministic() {
    let readings = [72.4, 76.0, 79.1, 75.6, 71.2, 71.4, 69.2, 65.2, 62.8, 61.4, 64.0, 67.5, 69.4];
    let content = thermometer_log(&readings);
    for _ in 0..5 {
        let report = evaluate_log(&content).unwrap();
        assert_eq!(report.get("temp-1"), Some(Label::Precise));
    }
}

#[test]
fn test_thermometer_single_reading() {
    let report = evaluate_log(&thermometer_log(&[70.0])).unwrap();
    assert_eq!(report.get("temp-1"), Some(Label::NotEnoughValues));
}

#[test]
fn test_humidistat_keep_then_discard() {
    let keep = log_with_reference(
        "humidistat hum-1\n\
         2007-04-05T22:04 45.2\n\
         2007-04-05T22:05 45.3\n\
         2007-04-05T22:06 45.1\n",
    );
    assert_eq!(evaluate_log(&keep).unwrap().get("hum-1"), Some(Label::Keep));

    let discard = format!("{}2007-04-05T22:07 50.0\n", keep);
    assert_eq!(evaluate_log(&discard).unwrap().get("hum-1"), Some(Label::Discard));
}

#[test]
fn test_humidistat_without_readings() {
    let report = evaluate_log(&log_with_reference("humidistat hum-1\n")).unwrap();
    assert_eq!(report.get("hum-1"), Some(Label::NotEnoughValues));
}

#[test]
fn test_non_timestamp_line_clears_context() {
    let content = log_with_reference(
        "humidistat hum-1\n\
         2007-04-05T22:04 45.2\n\
         note: recalibrated\n\
         2007-04-05T22:05 50.0\n",
    );
    let log = parse_log(&content).unwrap();
    assert_eq!(log.sensor("hum-1").unwrap().values, vec![45.2]);
    assert_eq!(evaluate_log(&content).unwrap().get("hum-1"), Some(Label::Keep));
}

#[test]
fn test_unsupported_sensor_is_absent() {
    let content = log_with_reference(
        "barometer baro-1\n\
         2007-04-05T22:04 1013.2\n\
         humidistat hum-1\n\
         2007-04-05T22:05 45.0\n",
    );
    let report = evaluate_log(&content).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.get("baro-1"), None);
}

#[test]
fn test_every_supported_sensor_gets_a_label_from_its_vocabulary() {
    let log = parse_log(SAMPLE_LOG).unwrap();
    let report = evaluate_sensors(&log).unwrap();
    assert_eq!(report.len(), log.sensor_count());

    for entry in report.iter() {
        let sensor = log.sensor(&entry.sensor).unwrap();
        let classifier = lookup(&sensor.sensor_type).unwrap();
        assert!(
            classifier.labels.contains(&entry.label),
            "{} labelled {} outside its vocabulary",
            entry.sensor,
            entry.label
        );
    }
}

#[test]
fn test_malformed_reference_line() {
    match evaluate_log("reference 70.0 humid\nhumidistat hum-1\n") {
        Err(QControllerError::MalformedLog { line, .. }) => assert_eq!(line, 1),
        other => panic!("unexpected result: {:?}", other),
    }
}
