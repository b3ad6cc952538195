use col_chart::storage;
use col_chart::{Dataset, SelectionState};
use tempfile::tempdir;

#[test]
fn csv_round_trip_keeps_order_and_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("london.csv");
    let original = Dataset::london_cost_of_living();
    storage::save_csv(&original, &path).unwrap();

    let loaded = storage::load(&path).unwrap();
    assert_eq!(loaded.title(), "london");
    assert_eq!(loaded.periods(), original.periods());
    assert_eq!(loaded.categories(), original.categories());
}

#[test]
fn json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("london.json");
    let original = Dataset::london_cost_of_living();
    storage::save_json(&original, &path).unwrap();
    let loaded = storage::load(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn loaded_csv_drives_the_chart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mini.csv");
    std::fs::write(
        &path,
        "category,period_id,period_label,value\n\
         Walking more,q1,Q1 2024,0.30\n\
         Walking more,q2,Q2 2024,0.40\n\
         Cooking at home,q2,Q2 2024,0.55\n\
         Cooking at home,q1,Q1 2024,0.25\n",
    )
    .unwrap();
    let d = storage::load_csv(&path, "Mini survey").unwrap();
    assert_eq!(d.categories()[1].values, vec![0.25, 0.55]);

    let mut chart = col_chart::ChartRenderer::new(d.clone(), Default::default());
    chart.update(&SelectionState::from_ids(&d, ["q1"]));
    assert_eq!(chart.value_domain(), (0.0, 0.30));
    assert_eq!(chart.scene().groups.len(), 2);
}

#[test]
fn duplicate_csv_cell_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    std::fs::write(
        &path,
        "category,period_id,period_label,value\nA,p,P,0.1\nA,p,P,0.2\n",
    )
    .unwrap();
    let err = storage::load_csv(&path, "dup").unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}
