use rstest::rstest;
use sales_forecast::catalog::ProductCatalog;
use sales_forecast::data::SalesObservation;
use sales_forecast::error::ForecastError;
use sales_forecast::features::{encode, features_and_labels, month_index};

fn obs(period: &str, product: &str, quantity: f64) -> SalesObservation {
    SalesObservation {
        period: period.to_string(),
        product: product.to_string(),
        quantity,
    }
}

#[rstest]
#[case("2024-01", 1)]
#[case("2024-07", 7)]
#[case("1987-07", 7)]
#[case("2030-12", 12)]
fn test_month_index(#[case] period: &str, #[case] expected: u32) {
    assert_eq!(month_index(period).unwrap(), expected);
}

#[test]
fn test_encode_maps_months_and_codes() {
    let observations = vec![
        obs("2024-01", "Widget", 5.0),
        obs("2024-02", "Widget", 7.0),
        obs("2024-01", "Gadget", 3.0),
    ];
    let catalog = ProductCatalog::build(&observations);
    let encoded = encode(&observations, &catalog).unwrap();

    let months: Vec<u32> = encoded.iter().map(|e| e.month_index).collect();
    let codes: Vec<usize> = encoded.iter().map(|e| e.product_code).collect();
    let quantities: Vec<f64> = encoded.iter().map(|e| e.quantity).collect();
    assert_eq!(months, vec![1, 2, 1]);
    assert_eq!(codes, vec![0, 0, 1]);
    assert_eq!(quantities, vec![5.0, 7.0, 3.0]);
    assert!(encoded.iter().all(|e| (1..=12).contains(&e.month_index)));

    let (features, labels) = features_and_labels(&encoded);
    assert_eq!(features, vec![[1.0, 0.0], [2.0, 0.0], [1.0, 1.0]]);
    assert_eq!(labels, vec![5.0, 7.0, 3.0]);
}

#[test]
fn test_encode_unknown_product_is_an_encoding_error() {
    let catalog = ProductCatalog::build(&[obs("2024-01", "Widget", 1.0)]);
    let result = encode(&[obs("2024-01", "Gadget", 1.0)], &catalog);

    assert!(matches!(result, Err(ForecastError::EncodingError(_))));
}

#[test]
fn test_encode_invalid_period_is_an_encoding_error() {
    let observations = vec![obs("Jan 202", "Widget", 1.0)];
    let catalog = ProductCatalog::build(&observations);

    assert!(matches!(
        encode(&observations, &catalog),
        Err(ForecastError::EncodingError(_))
    ));
}
