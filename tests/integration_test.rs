use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use salescharts::plotting::{render_chart, ChartStyle};
use salescharts::source::{DataSource, JsonFileSource};
use salescharts::{CalendarZone, ChartSettings, Config, DateRange, Granularity, SalesChart};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const RESPONSE: &str = r#"{
    "isSuccess": true,
    "error": "",
    "value": {
        "salesData": {
            "2024-01-15": 100,
            "2024-02-10": 50,
            "2024-03-01": 10,
            "2024-03-03": 20,
            "2024-05-01": 7,
            "1704844800000": 5,
            "not-a-date": 1000
        },
        "sumData": {
            "2024-01-15": 1.5,
            "2024-03-03T12:00:00Z": 0.25
        }
    }
}"#;

fn setup_data(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sales.json");
    fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

fn test_config() -> Config {
    Config {
        zone: CalendarZone::Utc,
        ..Config::default()
    }
}

fn settings(start: (i32, u32, u32), end: (i32, u32, u32), granularity: Granularity) -> ChartSettings {
    let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let range = DateRange::from_dates(date(start), date(end), CalendarZone::Utc).unwrap();
    ChartSettings {
        start: range.start,
        end: range.end,
        granularity,
    }
}

fn file_source(path: &Path) -> JsonFileSource {
    JsonFileSource::new(path).with_zone(CalendarZone::Utc)
}

#[tokio::test]
async fn test_full_workflow() {
    let (_temp_dir, path) = setup_data(RESPONSE);
    let source = file_source(&path);

    let mut chart = SalesChart::new(&test_config())
        .with_settings(settings((2024, 1, 1), (2024, 2, 28), Granularity::Month));
    assert!(chart.chart_data().is_empty());

    chart.load(&source).await.unwrap();
    assert!(!chart.is_loading);
    assert!(chart.error_message.is_none());

    // 1704844800000 is 2024-01-10T00:00:00Z
    assert_eq!(
        chart.chart_data().to_triples(),
        vec![
            ("2024-01".to_string(), 105.0, 1.5),
            ("2024-02".to_string(), 50.0, 0.0),
        ]
    );

    // Narrow to a few days, bucketed by day
    chart.set_settings(settings((2024, 3, 1), (2024, 3, 3), Granularity::Day));
    assert!(chart.needs_load());
    chart.load(&source).await.unwrap();
    assert_eq!(
        chart.chart_data().to_triples(),
        vec![
            ("2024-03-01".to_string(), 10.0, 0.0),
            ("2024-03-02".to_string(), 0.0, 0.0),
            ("2024-03-03".to_string(), 20.0, 0.25),
        ]
    );

    // Whole year by quarter
    chart.set_settings(settings((2024, 1, 1), (2024, 12, 31), Granularity::Quarter));
    chart.load(&source).await.unwrap();
    let quarterly = chart.chart_data();
    assert_eq!(quarterly.labels(), vec!["2024/Q1", "2024/Q2", "2024/Q3", "2024/Q4"]);
    assert_eq!(quarterly.sales(), vec![185.0, 7.0, 0.0, 0.0]);
    assert_eq!(quarterly.sums(), vec![1.75, 0.0, 0.0, 0.0]);

    // Same year by week walks the full grid
    let mut weekly = chart.settings;
    weekly.granularity = Granularity::Week;
    chart.set_settings(weekly);
    let weeks = chart.chart_data();
    assert_eq!(weeks.len(), 52);
    assert_eq!(weeks.total_sales(), 192.0);
}

#[tokio::test]
async fn test_error_handling() {
    // Reported failure
    {
        let (_temp_dir, path) = setup_data(r#"{ "isSuccess": false, "error": "backend down" }"#);
        let mut chart = SalesChart::new(&test_config())
            .with_settings(settings((2024, 1, 1), (2024, 1, 31), Granularity::Day));

        let result = chart.load(&file_source(&path)).await;
        assert!(result.is_err());
        assert!(!chart.is_loading);
        assert!(chart.error_message.as_deref().unwrap_or("").contains("backend down"));
        assert!(chart.chart_data().is_empty());
    }

    // Missing file
    {
        let mut chart = SalesChart::new(&test_config());
        let result = chart.load(&file_source(Path::new("/nonexistent/sales.json"))).await;
        assert!(result.is_err());
        assert!(chart.error_message.is_some());
    }

    // A successful load after a failure clears the error
    {
        let (_temp_dir, path) = setup_data(RESPONSE);
        let mut chart = SalesChart::new(&test_config())
            .with_settings(settings((2024, 1, 1), (2024, 1, 31), Granularity::Month));

        let _ = chart.load(&file_source(Path::new("/nonexistent/sales.json"))).await;
        assert!(chart.error_message.is_some());

        chart.load(&file_source(&path)).await.unwrap();
        assert!(chart.error_message.is_none());
        assert_eq!(chart.chart_data().total_sales(), 105.0);
    }
}

#[tokio::test]
async fn test_inverted_range_renders_nothing() {
    let (_temp_dir, path) = setup_data(RESPONSE);
    let mut chart = SalesChart::new(&test_config())
        .with_settings(settings((2024, 3, 3), (2024, 3, 1), Granularity::Day));

    chart.load(&file_source(&path)).await.unwrap();
    assert!(chart.chart_data().is_empty());
}

#[tokio::test]
async fn test_background_load() {
    let (_temp_dir, path) = setup_data(RESPONSE);
    let source: Arc<dyn DataSource> = Arc::new(file_source(&path));

    let mut chart = SalesChart::new(&test_config())
        .with_settings(settings((2024, 1, 1), (2024, 2, 28), Granularity::Month));
    chart.spawn_load(Arc::clone(&source));
    assert!(chart.is_loading);

    chart.set_settings(settings((2024, 3, 1), (2024, 3, 31), Granularity::Month));
    chart.spawn_load(source);

    assert!(chart.wait_for_load().await.unwrap());
    assert_eq!(
        chart.chart_data().to_triples(),
        vec![("2024-03".to_string(), 30.0, 0.25)]
    );
}

#[tokio::test]
#[ignore = "needs system fonts for text layout"]
async fn test_plot_generation() {
    let (temp_dir, path) = setup_data(RESPONSE);
    let mut chart = SalesChart::new(&test_config())
        .with_settings(settings((2024, 1, 1), (2024, 12, 31), Granularity::Month));
    chart.load(&file_source(&path)).await.unwrap();

    let plot_path = temp_dir.path().join("chart.png");
    render_chart(&chart.chart_data(), &plot_path, &ChartStyle::default()).unwrap();
    assert!(fs::metadata(&plot_path).unwrap().len() > 0);
}
