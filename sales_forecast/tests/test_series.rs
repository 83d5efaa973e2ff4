use pretty_assertions::assert_eq;
use sales_forecast::ForecastError;
use sales_forecast::catalog::ProductCatalog;
use sales_forecast::data::SalesObservation;
use sales_forecast::forecast::ForecastResult;
use sales_forecast::series::{assemble, assemble_with, PeriodLabels, SeriesBundle, SeriesDataset};

fn obs(period: &str, product: &str, quantity: f64) -> SalesObservation {
    SalesObservation {
        period: period.to_string(),
        product: product.to_string(),
        quantity,
    }
}

fn sample() -> (Vec<SalesObservation>, ProductCatalog, Vec<ForecastResult>) {
    let observations = vec![
        obs("2024-01", "Widget", 5.0),
        obs("2024-02", "Widget", 7.0),
        obs("2024-01", "Gadget", 3.0),
    ];
    let catalog = ProductCatalog::build(&observations);
    let results = vec![
        ForecastResult::new(0, vec![8.0, 9.0], 2).unwrap(),
        ForecastResult::new(1, vec![4.0, 4.5], 2).unwrap(),
    ];
    (observations, catalog, results)
}

#[test]
fn test_assemble_full_bundle() {
    let (observations, catalog, results) = sample();
    let bundle = assemble(&observations, &catalog, &results).unwrap();

    let expected = SeriesBundle {
        labels: vec![
            "2024-01".to_string(),
            "2024-02".to_string(),
            "2024-01".to_string(),
            "Future Month 1".to_string(),
            "Future Month 2".to_string(),
        ],
        datasets: vec![
            SeriesDataset {
                label: "Widget (Actual)".to_string(),
                values: vec![Some(5.0), Some(7.0)],
            },
            SeriesDataset {
                label: "Widget (Predicted)".to_string(),
                values: vec![None, None, Some(8.0), Some(9.0)],
            },
            SeriesDataset {
                label: "Gadget (Actual)".to_string(),
                values: vec![Some(3.0)],
            },
            SeriesDataset {
                label: "Gadget (Predicted)".to_string(),
                values: vec![None, Some(4.0), Some(4.5)],
            },
        ],
    };
    assert_eq!(bundle, expected);
}

#[test]
fn test_predicted_series_padding_matches_history() {
    let (observations, catalog, results) = sample();
    let bundle = assemble(&observations, &catalog, &results).unwrap();

    for (code, product) in catalog.iter() {
        let history = bundle.dataset(&format!("{} (Actual)", product)).unwrap();
        let predicted = bundle.dataset(&format!("{} (Predicted)", product)).unwrap();
        let horizon = results[code].horizons();

        assert_eq!(predicted.values.len(), history.values.len() + horizon);
        assert!(predicted.values[..history.values.len()]
            .iter()
            .all(Option::is_none));
        assert!(predicted.values[history.values.len()..]
            .iter()
            .all(Option::is_some));
    }
}

#[test]
fn test_bundle_json_shape() {
    let (observations, catalog, results) = sample();
    let json = assemble(&observations, &catalog, &results).unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["labels"].as_array().unwrap().len(), 5);
    assert_eq!(value["datasets"][1]["values"][0], serde_json::Value::Null);
    assert_eq!(value["datasets"][1]["values"][2], serde_json::json!(8.0));
}

#[test]
fn test_distinct_period_labels() {
    let (observations, catalog, results) = sample();
    let bundle = assemble_with(&observations, &catalog, &results, PeriodLabels::Distinct).unwrap();

    assert_eq!(
        bundle.labels,
        vec!["2024-01", "2024-02", "Future Month 1", "Future Month 2"]
    );
    // Padding still follows each product's own history.
    assert_eq!(bundle.datasets[3].values, vec![None, Some(4.0), Some(4.5)]);
}

#[test]
fn test_result_for_unknown_product_is_rejected() {
    let (observations, catalog, mut results) = sample();
    results.push(ForecastResult::new(7, vec![1.0, 2.0], 2).unwrap());

    let result = assemble(&observations, &catalog, &results);
    assert!(matches!(result, Err(ForecastError::EncodingError(_))));
}
