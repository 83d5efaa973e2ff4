use sales_forecast::error::ForecastError;
use std::io;
use std::time::Duration;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let forecast_error = ForecastError::from(json_error);
    assert!(matches!(forecast_error, ForecastError::SerializationError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::EmptyDataset("no valid rows".to_string());
    assert_eq!(error.to_string(), "Empty dataset: no valid rows");

    let error = ForecastError::Cancelled { epochs_completed: 3 };
    assert_eq!(error.to_string(), "Training cancelled after 3 epoch(s)");

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_user_facing_classification() {
    assert!(ForecastError::EmptyDataset(String::new()).is_user_facing());
    assert!(ForecastError::Timeout(Duration::from_secs(1)).is_user_facing());
    assert!(!ForecastError::EncodingError(String::new()).is_user_facing());
    assert!(!ForecastError::TrainingError(String::new()).is_user_facing());
}
