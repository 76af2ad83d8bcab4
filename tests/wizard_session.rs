use std::time::{Duration, Instant};

use botbuilder_wizard::{
    HostMessage, InputState, InputType, PageLayout, PropertyValue, RecordingBridge, SetupError,
    UPDATE, WizardContext, WizardEvent, WizardOptions,
};
use serde_json::{Value, json};

fn page() -> PageLayout {
    serde_json::from_value(json!({
        "title": "New Subsystem",
        "catalogs": {
            "hardwareTypes": {
                "Motor Controllers": [
                    {"descriptor": "edu.wpi.first.wpilibj.Talon", "name": "Talon"},
                    {"descriptor": "edu.wpi.first.wpilibj.Spark", "name": "Spark"}
                ],
                "Sensors": [{"descriptor": "edu.wpi.first.wpilibj.Encoder", "name": "Encoder"}]
            }
        },
        "elements": [
            {"class": "parameterSelector", "id": "hardware", "paramClass": "HardwareParameter"},
            {
                "class": "inputLine",
                "id": "className",
                "tests": [
                    {"name": "empty", "rule": "notEmpty", "message": "Class name required", "priority": 30},
                    {"name": "chars", "rule": "matches", "pattern": "^[A-Za-z0-9_]*$", "message": "Invalid characters", "priority": 25}
                ]
            }
        ]
    }))
    .unwrap()
}

fn wizard() -> WizardContext<RecordingBridge> {
    WizardContext::from_page(&page(), RecordingBridge::new(), WizardOptions::default()).unwrap()
}

fn ids(messages: &[HostMessage]) -> Vec<&str> {
    messages.iter().map(|message| message.id.as_str()).collect()
}

#[test]
fn data_lists_input_lines_before_selectors() {
    let mut wizard = wizard();
    wizard
        .dispatch(
            WizardEvent::AddParameter {
                selector: "hardware".into(),
            },
            Instant::now(),
        )
        .unwrap();

    let data = wizard.get_data();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].data_type, InputType::InputLine);
    assert_eq!(data[1].id, "hardware");
    assert_eq!(
        data[1].data,
        json!([{"type": "edu.wpi.first.wpilibj.Talon", "name": "", "doc": ""}])
    );
}

#[test]
fn validate_reports_every_component() {
    let mut wizard = wizard();
    let now = Instant::now();
    wizard
        .dispatch(WizardEvent::AddParameter { selector: "hardware".into() }, now)
        .unwrap();

    assert!(!wizard.validate());
    assert_eq!(
        wizard.input("className").unwrap().validator().notice().unwrap().message,
        "Class name required"
    );
    let row = &wizard.selector("hardware").unwrap().parameters()[0];
    assert!(row.notice().is_some(), "rows are validated after the input fails");

    wizard
        .dispatch(WizardEvent::Input { id: "className".into(), value: "Arm".into() }, now)
        .unwrap();
    wizard
        .dispatch(
            WizardEvent::SetProperty {
                selector: "hardware".into(),
                index: 0,
                property: "name".into(),
                value: PropertyValue::from("armMotor"),
            },
            now,
        )
        .unwrap();
    assert!(wizard.validate());
}

#[test]
fn named_data_keeps_the_later_duplicate() {
    let page: PageLayout = serde_json::from_value(json!({
        "elements": [
            {"class": "inputLine", "id": "name", "value": "first"},
            {"class": "inputLine", "id": "name", "value": "second"}
        ]
    }))
    .unwrap();
    let wizard =
        WizardContext::from_page(&page, RecordingBridge::new(), WizardOptions::default()).unwrap();

    let named = wizard.get_named_data();
    assert_eq!(named.len(), 1);
    assert_eq!(named["name"].data, json!("second"));
    assert_eq!(wizard.get_data().len(), 2);
}

#[test]
fn set_state_fans_out_by_id_and_type() {
    let mut wizard = wizard();
    let message = HostMessage::set_state(&[
        InputState::new("className", InputType::InputLine, json!("Elevator")),
        InputState::new(
            "hardware",
            InputType::ParameterSelector,
            json!([
                {"type": "edu.wpi.first.wpilibj.Spark", "name": "lift", "doc": "Lift motor"},
                {"type": "edu.wpi.first.wpilibj.Encoder", "name": "height"}
            ]),
        ),
        InputState::new("missing", InputType::InputLine, json!("dropped")),
        InputState::new("className", InputType::ParameterSelector, json!([])),
    ])
    .unwrap();

    assert_eq!(wizard.handle_message(&message), 2);
    assert_eq!(wizard.input("className").unwrap().value(), "Elevator");
    let selector = wizard.selector("hardware").unwrap();
    assert_eq!(selector.len(), 2);
    assert_eq!(selector.rendered_rows(), 2);
    assert_eq!(selector.parameters()[1].fields().doc(), "");
    assert!(wizard.bridge().messages().is_empty(), "applying state never posts");
}

#[test]
fn malformed_entries_do_not_sink_the_payload() {
    let mut wizard = wizard();
    let applied = wizard.apply_state(&[
        json!({"id": "hardware"}),
        json!({"id": "hardware", "dataType": "PARAMETER_SELECTOR", "data": {"not": "a list"}}),
        json!({"id": "className", "dataType": "INPUT_LINE", "data": "Intake"}),
    ]);
    assert_eq!(applied, 1);
    assert_eq!(wizard.input("className").unwrap().value(), "Intake");
    assert!(wizard.selector("hardware").unwrap().is_empty());
}

#[test]
fn unknown_host_messages_are_ignored() {
    let mut wizard = wizard();
    let message = HostMessage::new("refresh", Value::Null);
    assert_eq!(wizard.handle_message(&message), 0);
}

#[test]
fn key_release_saves_immediately() {
    let mut wizard = wizard();
    wizard.dispatch(WizardEvent::KeyUp, Instant::now()).unwrap();

    let messages = wizard.bridge().messages();
    assert_eq!(ids(messages), [UPDATE]);
    assert_eq!(messages[0].payload[0]["id"], json!("className"));
}

#[test]
fn pointer_release_saves_after_the_delay() {
    let mut wizard = wizard();
    let start = Instant::now();
    wizard.dispatch(WizardEvent::MouseUp, start).unwrap();
    wizard.dispatch(WizardEvent::MouseUp, start + Duration::from_millis(10)).unwrap();
    assert_eq!(wizard.pending_autosaves(), 2);

    assert_eq!(wizard.poll_autosave(start + Duration::from_millis(49)).unwrap(), 0);
    assert_eq!(wizard.poll_autosave(start + Duration::from_millis(50)).unwrap(), 1);
    assert_eq!(wizard.poll_autosave(start + Duration::from_millis(60)).unwrap(), 1);
    assert_eq!(ids(wizard.bridge().messages()), [UPDATE, UPDATE]);
}

#[test]
fn deferred_save_sees_the_finished_drop() {
    let mut wizard = wizard();
    let start = Instant::now();
    for _ in 0..3 {
        wizard
            .dispatch(WizardEvent::AddParameter { selector: "hardware".into() }, start)
            .unwrap();
    }
    for (index, name) in ["a", "b", "c"].into_iter().enumerate() {
        wizard
            .dispatch(
                WizardEvent::SetProperty {
                    selector: "hardware".into(),
                    index,
                    property: "name".into(),
                    value: name.into(),
                },
                start,
            )
            .unwrap();
    }

    wizard
        .dispatch(
            WizardEvent::DragStart { selector: "hardware".into(), index: 2, x: 0.0, y: 140.0 },
            start,
        )
        .unwrap();
    wizard.dispatch(WizardEvent::MouseUp, start).unwrap();
    assert!(
        wizard
            .dispatch(WizardEvent::DragEnd { selector: "hardware".into(), y: -10.0 }, start)
            .unwrap()
    );
    wizard.flush_autosave().unwrap();

    let payload = &wizard.bridge().messages()[0].payload;
    let names = payload[1]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, ["c", "a", "b"]);
}

#[test]
fn autosave_can_be_disabled() {
    let mut wizard = WizardContext::from_page(
        &page(),
        RecordingBridge::new(),
        WizardOptions::default().with_autosave(false),
    )
    .unwrap();
    let now = Instant::now();
    wizard.dispatch(WizardEvent::KeyUp, now).unwrap();
    wizard.dispatch(WizardEvent::MouseUp, now).unwrap();
    assert_eq!(wizard.pending_autosaves(), 0);
    assert!(wizard.into_bridge().messages().is_empty());
}

#[test]
fn events_for_unknown_elements_change_nothing() {
    let mut wizard = wizard();
    let now = Instant::now();
    assert!(!wizard
        .dispatch(WizardEvent::AddParameter { selector: "nope".into() }, now)
        .unwrap());
    assert!(!wizard
        .dispatch(WizardEvent::Input { id: "nope".into(), value: "x".into() }, now)
        .unwrap());
    assert!(!wizard
        .dispatch(WizardEvent::RemoveParameter { selector: "hardware".into(), index: 3 }, now)
        .unwrap());
}

#[test]
fn rejects_unknown_parameter_classes() {
    let page: PageLayout = serde_json::from_value(json!({
        "elements": [{"class": "parameterSelector", "id": "x", "paramClass": "CommandParameter"}]
    }))
    .unwrap();
    let err = WizardContext::from_page(&page, RecordingBridge::new(), WizardOptions::default())
        .err()
        .unwrap();
    assert!(err.to_string().contains("CommandParameter"));
}

#[test]
fn adding_to_an_empty_catalog_is_an_error() {
    let page: PageLayout = serde_json::from_value(json!({
        "elements": [{"class": "parameterSelector", "id": "subs", "paramClass": "SubsystemParameter"}]
    }))
    .unwrap();
    let mut wizard =
        WizardContext::from_page(&page, RecordingBridge::new(), WizardOptions::default()).unwrap();
    let result = wizard.dispatch(WizardEvent::AddParameter { selector: "subs".into() }, Instant::now());
    let err = result.unwrap_err();
    assert!(err.downcast_ref::<SetupError>().is_some());
    assert!(wizard.selector("subs").unwrap().is_empty());
}

#[test]
fn set_state_updates_only_the_first_shared_id() {
    let page: PageLayout = serde_json::from_value(json!({
        "elements": [
            {"class": "inputLine", "id": "name", "value": "first"},
            {"class": "inputLine", "id": "name", "value": "second"}
        ]
    }))
    .unwrap();
    let mut wizard =
        WizardContext::from_page(&page, RecordingBridge::new(), WizardOptions::default()).unwrap();

    let message =
        HostMessage::set_state(&[InputState::new("name", InputType::InputLine, json!("updated"))])
            .unwrap();
    assert_eq!(wizard.handle_message(&message), 1);

    let values = wizard
        .inputs()
        .iter()
        .map(|line| line.value())
        .collect::<Vec<_>>();
    assert_eq!(values, ["updated", "second"]);
}

#[test]
fn host_state_clears_a_stale_input_notice() {
    let mut wizard = wizard();
    assert!(!wizard.validate());
    assert!(wizard.render().contains("Class name required"));

    let applied = wizard.apply_state(&[json!({
        "id": "className",
        "dataType": "INPUT_LINE",
        "data": "Elevator"
    })]);
    assert_eq!(applied, 1);
    assert!(wizard.input("className").unwrap().validator().notice().is_none());
    assert!(!wizard.render().contains("Class name required"));
}
