use climate_dashboard::config::DashboardConfig;
use climate_dashboard::dashboard::{Dashboard, DashboardView};
use climate_dashboard::data::{
    Bounds, ClimateCleaner, CoercionRules, CsvExporter, DataLoader, FilterSelection, LayoutMode,
};
use climate_dashboard::stats::{Aggregator, GroupKey, GroupValue};
use climate_dashboard::DashboardError;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use tempfile::TempDir;

/// DOSM-style upload: positional headers, a thousands separator, a decimal
/// comma, placeholders, a duplicate and a few out-of-range rows.
const DOSM_CSV: &str = "\
Negeri,Stesen,Ketinggian,Tahun,Suhu Min,Suhu Maks,Hujan,Hari Hujan,Kelembapan
Selangor,KLIA,16,2010,24,33,\"150,5\",12,80
Selangor,KLIA,16,2011,24.5,33.5,\"2,310\",190,81
Selangor,KLIA,16,2011,25,34,200,10,82
Johor,Senai,37,2010,23,32,220,15,84
Johor,Senai,37,2011,23,33,230,16,105
Johor,Senai,37,2012,-,33,230,16,85
Sabah,Kota Kinabalu,3,2010,4,31,300,20,83
Sabah,Kota Kinabalu,3,2011,24,46,310,21,83
Sabah,Kota Kinabalu,3,2012,24,31,N/A,21,83
Kelantan,Kota Bharu,5,2012,23,31,400,22,86
";

fn load_dataset() -> (Dashboard, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("malaysia_climate.csv");
    std::fs::write(&path, DOSM_CSV).unwrap();

    let mut dashboard = Dashboard::new(DashboardConfig::default());
    dashboard.load_path(&path).unwrap();
    (dashboard, dir)
}

#[test]
fn test_cleaning_report_counts() {
    let (dashboard, _dir) = load_dataset();
    let report = &dashboard.dataset().unwrap().report;

    assert_eq!(report.input_rows, 10);
    assert_eq!(report.dropped_missing, 2);
    assert_eq!(report.dropped_out_of_bounds, 3);
    assert_eq!(report.dropped_duplicates, 1);
    assert_eq!(report.output_rows, 4);
}

#[test]
fn test_reference_row_is_cleaned() {
    let (dashboard, _dir) = load_dataset();
    let table = &dashboard.dataset().unwrap().table;
    let first = &table.records()[0];

    assert_eq!(first.state, "Selangor");
    assert_eq!(first.station, "KLIA");
    assert_eq!(first.altitude_m, Some(16.0));
    assert_eq!(first.year, 2010);
    assert_eq!((first.min_temp_c, first.max_temp_c), (24.0, 33.0));
    assert_eq!(first.rainfall_mm, 150.5);
    assert_eq!(first.rain_days, Some(12.0));
    assert_eq!(first.humidity_pct, 80.0);
    assert_eq!(first.avg_temp_c, 28.5);

    let second = &table.records()[1];
    assert_eq!(second.rainfall_mm, 2310.0, "thousands separator stripped");
}

#[test]
fn test_cleaned_records_hold_invariants() {
    let (dashboard, _dir) = load_dataset();
    let table = &dashboard.dataset().unwrap().table;

    let mut keys = HashSet::new();
    for record in table.records() {
        assert!((0.0..=100.0).contains(&record.humidity_pct));
        assert!(record.min_temp_c >= 5.0);
        assert!(record.max_temp_c <= 45.0);
        assert!(record.rainfall_mm >= 0.0);
        assert_eq!(record.avg_temp_c, (record.min_temp_c + record.max_temp_c) / 2.0);
        assert!(
            keys.insert((record.state.clone(), record.station.clone(), record.year)),
            "duplicate (State, Station, Year)"
        );
    }
}

#[test]
fn test_full_selection_is_identity() {
    let (dashboard, _dir) = load_dataset();
    let table = &dashboard.dataset().unwrap().table;
    let selection = FilterSelection::full(table).unwrap();

    assert_eq!(&selection.apply(table), table);
    assert_eq!(&dashboard.view().unwrap().filtered, table);
}

#[test]
fn test_single_year_aggregation() {
    let (dashboard, _dir) = load_dataset();
    let table = &dashboard.dataset().unwrap().table;
    let mut selection = FilterSelection::full(table).unwrap();
    selection.from_year = 2012;
    selection.to_year = 2012;

    let year = selection.apply(table);
    let rows = Aggregator::group_means(&year, GroupKey::Year);

    assert_eq!(rows.len(), 1);
    let only = &year.records()[0];
    assert_eq!(rows[0].key, GroupValue::Year(2012));
    assert_eq!(rows[0].count, 1);
    assert_eq!(rows[0].avg_temp_c, only.avg_temp_c);
    assert_eq!(rows[0].rainfall_mm, only.rainfall_mm);
    assert_eq!(rows[0].humidity_pct, only.humidity_pct);
}

#[test]
fn test_exported_csv_reloads_to_same_table() {
    let (dashboard, dir) = load_dataset();
    let exported = dir.path().join("filtered.csv");
    dashboard.export_csv(&exported).unwrap();

    let header = std::fs::read_to_string(&exported).unwrap();
    assert_eq!(
        header.lines().next().unwrap(),
        "State,Station,Altitude_m,Year,MinTemp_C,MaxTemp_C,Rainfall_mm,RainDays,Humidity_pct,AvgTemp_C"
    );

    let upload = DataLoader::load_csv(&exported).unwrap();
    let rules = CoercionRules::default();
    let bounds = Bounds::default();
    let (reloaded, report) = ClimateCleaner::new(&rules, &bounds, LayoutMode::Auto)
        .clean(&upload.table)
        .unwrap();

    assert_eq!(report.output_rows, report.input_rows);
    assert_eq!(&reloaded, &dashboard.dataset().unwrap().table);
}

#[test]
fn test_export_bytes_of_empty_selection() {
    let (mut dashboard, _dir) = load_dataset();
    dashboard.clear_states();
    let view = dashboard.view().unwrap();

    assert!(view.is_empty());
    let bytes = CsvExporter::to_bytes(&view.filtered).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 1);
    assert!(matches!(dashboard.report(), Err(DashboardError::EmptyResultSet)));
}

#[test]
fn test_regional_view() {
    let (mut dashboard, _dir) = load_dataset();
    dashboard.set_state("Kelantan", false);
    let view: &DashboardView = dashboard.view().unwrap();

    let states: Vec<String> = view.by_state.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(states, vec!["Johor", "Selangor"]);

    let summary = &view.summary;
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.year_span_label(), "2010–2011");
}

#[test]
fn test_missing_file() {
    let mut dashboard = Dashboard::new(DashboardConfig::default());
    let result = dashboard.load_path(std::path::Path::new("does/not/exist.csv"));
    assert!(result.is_err());
    assert!(dashboard.view().is_none());
}
