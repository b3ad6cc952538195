use std::fs;
use std::path::PathBuf;
use col_chart::viz::{self, ChartConfig, ChartRenderer};
use col_chart::{Dataset, SelectionState};

const IDS: [&str; 4] = ["jan22", "may22", "sept22", "jan23"];

fn write_and_check<F: Fn(&PathBuf)>(maker: F, name: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join(name);
    maker(&path);
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "{name} has content");
}

/// Every non-empty subset of the four periods.
fn subsets() -> Vec<Vec<&'static str>> {
    (1u32..16)
        .map(|mask| {
            IDS.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| *id)
                .collect()
        })
        .collect()
}

#[test]
fn output_formats_produce_files() {
    let d = Dataset::london_cost_of_living();
    let sel = SelectionState::all(&d);
    for name in ["chart.svg", "chart.html", "chart.png"] {
        write_and_check(
            |p| viz::render_chart(&d, &sel, &ChartConfig::default(), p).unwrap(),
            name,
        );
    }
}

#[test]
fn value_domain_is_max_of_visible_values() {
    let d = Dataset::london_cost_of_living();
    let mut chart = ChartRenderer::london();
    for subset in subsets() {
        let sel = SelectionState::from_ids(&d, &subset);
        chart.update(&sel);
        let expected = d
            .categories()
            .iter()
            .flat_map(|c| {
                d.periods()
                    .iter()
                    .zip(&c.values)
                    .filter(|(p, _)| subset.contains(&p.id.as_str()))
                    .map(|(_, v)| *v)
            })
            .fold(f64::MIN, f64::max);
        assert_eq!(chart.value_domain(), (0.0, expected), "{subset:?}");
        assert_eq!(chart.scene().legend.len(), subset.len(), "{subset:?}");
    }
}

#[test]
fn bars_follow_period_order_regardless_of_selection_order() {
    let d = Dataset::london_cost_of_living();
    let mut chart = ChartRenderer::london();
    chart.update(&SelectionState::from_ids(&d, ["jan23", "may22", "jan22"]));
    chart.settle();
    for group in &chart.scene().groups {
        let ids: Vec<&str> = group.bars().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["jan22", "may22", "jan23"]);
    }
    let legend: Vec<&str> = chart.scene().legend.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(legend, vec!["Jan 2022", "May 2022", "Jan 2023"]);
}

#[test]
fn svg_structure() {
    let mut chart = ChartRenderer::london();
    chart.update(&SelectionState::all(chart.dataset()));
    chart.settle();
    let svg = chart.to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"<g transform="translate(220,40)">"#));
    assert!(svg.contains(r#"class="x axis" transform="translate(0,330)""#));
    assert!(svg.contains(r#"class="y axis""#));
    assert_eq!(svg.matches(r#"<g class="category""#).count(), 5);
    assert_eq!(svg.matches("<rect x=").count(), 20);
    assert_eq!(svg.matches(r#"class="legend-color""#).count(), 4);
    assert!(svg.contains(">50%</text>"));
    assert!(svg.contains("Several ways Londoners tackle the cost-of-living crisis"));
    assert!(svg.contains("fill: #001181;"));
}

#[test]
fn empty_selection_renders_axes_only() {
    let mut chart = ChartRenderer::london();
    chart.update(&SelectionState::new());
    chart.settle();
    let svg = chart.to_svg();
    assert_eq!(svg.matches("<rect x=").count(), 0);
    assert_eq!(svg.matches(r#"class="legend""#).count(), 0);
    assert!(svg.contains(">0%</text>"));
    assert_eq!(svg.matches(r#"<g class="tick""#).count(), 1 + 5);
}

#[test]
fn custom_config_changes_layout() {
    let config = ChartConfig {
        width: 1000,
        title: Some("Custom".into()),
        ..ChartConfig::default()
    };
    let mut chart = ChartRenderer::new(Dataset::london_cost_of_living(), config);
    chart.update(&SelectionState::all(chart.dataset()));
    chart.settle();
    assert_eq!(chart.scene().inner_width, 760.0);
    assert_eq!(chart.scene().title.text, "Custom");
    let widest = chart
        .scene()
        .bars()
        .map(|(_, b)| b.width())
        .fold(0.0, f64::max);
    assert_eq!(widest, 760.0);
}
