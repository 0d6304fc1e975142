//! Multi-file and multi-device conversion tests

use super::{TestWorkspace, read_output_rows};
use crate::processor::Converter;
use crate::processor::metadata::ScriptedPrompter;

#[test]
fn test_same_device_in_two_files_is_merged() {
    let workspace = TestWorkspace::new();
    workspace.write_export(
        "a_export.csv",
        &[
            "//Morisset/10409.AV28,a,b,c,From A 1,23.1 °C",
            "//Morisset/10409.AV29,a,b,c,From A 2,10 %",
        ],
    );
    workspace.write_export(
        "b_export.csv",
        &["//Morisset/10409.AI3,a,b,c,From B 1,0.0 L/s"],
    );

    let converter = Converter::new(workspace.config()).unwrap();
    let mut prompter = ScriptedPrompter::new(["007_MRT", "AHU-1"]);
    let stats = converter.run(&mut prompter).unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.groups_found, 1);
    assert_eq!(prompter.asked().len(), 2);
    assert_eq!(
        prompter.asked()[1],
        "Enter Device Name for 10409 (source: a_export.csv, b_export.csv)"
    );

    let rows = read_output_rows(&workspace.output("10409.csv"));
    let names: Vec<&str> = rows[1..].iter().map(|r| r[2].as_str()).collect();
    assert_eq!(names, vec!["From A 1", "From A 2", "From B 1"]);
}

#[test]
fn test_devices_prompted_in_discovery_order() {
    let workspace = TestWorkspace::new();
    workspace.write_export(
        "export.csv",
        &[
            "//Site/300.AV1,a,b,c,P1,",
            "//Site/100.AV1,a,b,c,P2,",
            "//Site/300.AV2,a,b,c,P3,",
            "//Site/200.AV1,a,b,c,P4,",
        ],
    );

    let converter = Converter::new(workspace.config()).unwrap();
    let mut prompter = ScriptedPrompter::new(["Tower", "Dev300", "Dev100", "Dev200"]);
    let stats = converter.run(&mut prompter).unwrap();

    assert_eq!(stats.groups_written, 3);
    let written: Vec<&str> = stats
        .outputs
        .iter()
        .map(|o| o.device_number.as_str())
        .collect();
    assert_eq!(written, vec!["300", "100", "200"]);

    let rows = read_output_rows(&workspace.output("100.csv"));
    assert_eq!(rows[1][4], "Tower");
    assert_eq!(rows[1][6], "Dev100");
}

#[test]
fn test_rows_without_device_number_group_under_file_stem() {
    let workspace = TestWorkspace::new();
    workspace.write_export(
        "plantroom.csv",
        &[
            "Plant.AI1,a,b,c,Header Temp,60 °C",
            "//Site/55.AV1,a,b,c,Device Point,1 kW",
        ],
    );

    let converter = Converter::new(workspace.config()).unwrap();
    let stats = converter
        .run(&mut ScriptedPrompter::new(["B", "Plant Room", "Meter"]))
        .unwrap();

    assert_eq!(stats.groups_written, 2);

    let rows = read_output_rows(&workspace.output("plantroom.csv"));
    assert_eq!(
        rows[1],
        vec!["AI", "1", "Header Temp", "°C", "B", "plantroom", "Plant Room"]
    );
    assert!(workspace.output("55.csv").is_file());
}

#[test]
fn test_building_asked_once_for_many_devices() {
    let workspace = TestWorkspace::new();
    workspace.write_export("one.csv", &["//Site/1.AV1,a,b,c,P,"]);
    workspace.write_export("two.csv", &["//Site/2.AV1,a,b,c,P,"]);
    workspace.write_export("three.csv", &["//Site/3.AV1,a,b,c,P,"]);

    let converter = Converter::new(workspace.config()).unwrap();
    let mut prompter = ScriptedPrompter::new(["Tower", "D1", "D3", "D2"]);
    converter.run(&mut prompter).unwrap();

    let building_prompts = prompter
        .asked()
        .iter()
        .filter(|label| label.starts_with("Enter Building"))
        .count();
    assert_eq!(building_prompts, 1);
    assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_written_values_survive_round_trip() {
    let workspace = TestWorkspace::new();
    workspace.write_export(
        "export.csv",
        &["//Site/9.AV1,a,b,c,\"Zone \"\"North\"\", Level 2\",21.5 m³/h"],
    );

    let converter = Converter::new(workspace.config()).unwrap();
    converter
        .run(&mut ScriptedPrompter::new(["Bâtiment Ω", "Fan Coil, North"]))
        .unwrap();

    let rows = read_output_rows(&workspace.output("9.csv"));
    assert_eq!(
        rows[1],
        vec![
            "AV",
            "1",
            "Zone \"North\", Level 2",
            "m³/h",
            "Bâtiment Ω",
            "9",
            "Fan Coil, North"
        ]
    );
}
