//! End-to-end behavior of the base model aggregate.

use qmri_model::{
    ActivePolarity, BaseModel, ControlValue, DependencyRule, EventKind, ProtocolField,
    UnitRegistry, UnitState,
};
use qmri_persistence::{ModelProperties, PropertyValue, SnapshotSource, load, save};

fn registry() -> UnitRegistry {
    let mut registry = UnitRegistry::new();
    registry.register("qData", "TE", "(s)", 1000.0);
    registry
}

fn inversion_recovery_model() -> BaseModel {
    let mut model = BaseModel::new("2.5.0")
        .with_protocol(ProtocolField::single_column("qData", "TE", vec![10.0, 20.0]));
    model.controls.push_control("UseL1", ControlValue::Flag(true));
    model.controls.push_control("Lambda", ControlValue::Scalar(0.05));
    model.controls.push_panel("Tissue");
    model.controls.push_control("T1Bounds", ControlValue::Vector(vec![0.0, 5.0]));
    model
}

#[test]
fn unit_toggle_through_the_model_never_double_scales() {
    let registry = registry();
    let mut model = inversion_recovery_model();

    model.to_user_units(&registry).expect("to user units");
    assert_eq!(model.unit_state, UnitState::UserFacing);
    assert_eq!(model.protocol[0].mat, vec![vec![0.01], vec![0.02]]);

    // Second toggle in the same direction: flag already says user units.
    model.to_user_units(&registry).expect("repeat");
    assert_eq!(model.protocol[0].mat, vec![vec![0.01], vec![0.02]]);

    model.to_original_units(&registry).expect("back");
    assert_eq!(model.unit_state, UnitState::Original);
    assert_eq!(model.protocol[0].mat, vec![vec![10.0], vec![20.0]]);
    assert_eq!(model.protocol[0].format, vec!["TE".to_string()]);
}

#[test]
fn use_l1_checkbox_gates_lambda() {
    let mut model = inversion_recovery_model();
    let rules = vec![DependencyRule::new(
        "UseL1",
        "Lambda",
        EventKind::EnableDisable,
        ActivePolarity::OnTriggersPositive,
    )];

    // UseL1 is checked: positive polarity leaves Lambda enabled.
    model.apply_rules(&rules).expect("apply");
    assert!(!model.controls.is_disabled("Lambda").expect("state"));

    model
        .controls
        .set_value("UseL1", ControlValue::Flag(false))
        .expect("uncheck");
    model.apply_rules(&rules).expect("apply");
    assert!(model.controls.is_disabled("Lambda").expect("state"));
}

#[test]
fn snapshot_round_trip_preserves_units_flag_and_values() {
    let registry = registry();
    let mut model = inversion_recovery_model();
    model.to_user_units(&registry).expect("convert");
    model
        .controls
        .set_value("Lambda", ControlValue::Scalar(0.2))
        .expect("set");

    let snapshot = save(&model).expect("save");
    assert_eq!(snapshot.version(), Some("2.5.0"));

    let mut restored = inversion_recovery_model();
    load(&mut restored, SnapshotSource::Memory(&snapshot)).expect("load");
    assert_eq!(restored, model);
    assert_eq!(restored.unit_state, UnitState::UserFacing);
}

#[test]
fn old_snapshot_loads_into_extended_schema() {
    // Snapshot taken before the Lambda control existed.
    let mut old_model = BaseModel::new("2.4.0")
        .with_protocol(ProtocolField::single_column("qData", "TE", vec![10.0, 20.0]));
    old_model.controls.push_control("UseL1", ControlValue::Flag(false));
    let snapshot = save(&old_model).expect("save");

    let mut current = inversion_recovery_model();
    let outcome = load(&mut current, SnapshotSource::Memory(&snapshot)).expect("load");

    // Shared properties patched, new ones at their defaults.
    assert_eq!(
        current.controls.value_of("UseL1").expect("value"),
        &ControlValue::Flag(false)
    );
    assert_eq!(
        current.controls.value_of("Lambda").expect("value"),
        &ControlValue::Scalar(0.05)
    );
    assert!(outcome.defaulted.contains(&"Lambda".to_string()));
    // The version property is patched like any other.
    assert_eq!(current.version, "2.4.0");
}

#[test]
fn snapshot_with_retired_property_loads_cleanly() {
    let model = inversion_recovery_model();
    let mut snapshot = save(&model).expect("save");
    snapshot.insert("SigmaSmoothing", PropertyValue::Scalar(1.5));

    let mut restored = inversion_recovery_model();
    let outcome = load(&mut restored, SnapshotSource::Memory(&snapshot)).expect("load");

    assert_eq!(restored, model);
    assert_eq!(outcome.dropped, vec!["SigmaSmoothing".to_string()]);
}

#[test]
fn protocol_table_survives_the_property_seam() {
    let model = inversion_recovery_model();
    let value = model.property("qData").expect("property");
    assert_eq!(
        value,
        PropertyValue::Table {
            format: vec!["TE".to_string()],
            rows: vec![vec![10.0], vec![20.0]],
        }
    );
}
