use clap::Parser;
use courtwatch::utils::{logger, validation::Validate};
use courtwatch::{envelope, AggregateError, Aggregator, CliConfig, LocationRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting courtwatch CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let aggregator = Aggregator::new(LocationRegistry::default(), config.endpoints());

    match aggregator.aggregate(&config.location).await {
        Ok(aggregation) => {
            let response = envelope::success(aggregation);
            if config.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "✅ {}: {} bookable slots (updated {})",
                    response.location,
                    response.total_slots,
                    response.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
                );
                for slot in &response.data {
                    println!(
                        "  {}  {}",
                        slot.date_time.format("%a %Y-%m-%d %H:%M"),
                        slot.resource_name
                    );
                }
            }
        }
        Err(AggregateError::UnknownLocation { location, known }) => {
            tracing::error!("❌ Unknown location: {}", location);
            eprintln!(
                "❌ Unknown location '{}'. Known locations: {}",
                location,
                known.join(", ")
            );
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("❌ Aggregation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    }

    Ok(())
}
