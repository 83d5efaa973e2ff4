use sales_forecast::{ForecastPipeline, PipelineConfig, RawRecord};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sales Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    let rows = create_sample_rows();
    println!("Sample data created: {} rows\n", rows.len());

    let config = PipelineConfig::default().with_seed(7);
    let pipeline = ForecastPipeline::new(config)?;

    println!("Training model...");
    let output = pipeline.run(&rows)?;
    println!(
        "Model trained: {} epochs, final loss {:.4}\n",
        output.report.epochs_run,
        output.report.loss_history.last().copied().unwrap_or_default()
    );
    println!("{}", output.report.fit);

    for result in &output.results {
        let product = output.catalog.product_of(result.product_code()).unwrap_or("?");
        println!("{:<10} {:?}", product, result.values());
    }

    println!("\nChart bundle:\n{}", output.bundle.to_json_pretty()?);
    Ok(())
}

fn create_sample_rows() -> Vec<RawRecord> {
    let mut rows = Vec::new();
    for month in 1..=12 {
        let created = format!("2024-{:02}-15 10:00:00", month);
        let widget = 20.0 + 5.0 * (month as f64 / 12.0 * std::f64::consts::TAU).sin();
        let gadget = 8.0 + month as f64 * 0.5;
        rows.push(RawRecord::sale(&created, "Widget", &format!("{:.0}", widget)));
        rows.push(RawRecord::sale(&created, "Gadget", &format!("{:.1}", gadget)));
    }
    // Malformed rows are dropped before training.
    rows.push(RawRecord::sale("", "Widget", "10"));
    rows.push(RawRecord::sale("2024-03-01", "Gadget", "n/a"));
    rows
}
