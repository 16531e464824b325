mod models;
mod scrapers;

use anyhow::{bail, Context};
use scrapers::{HemnetCrawler, HttpFetcher, LocationResolver, SearchParams};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Hemnet Pricer - sold price crawler");

    let mut params = SearchParams::from_env();
    let fetcher = HttpFetcher::new()?;

    if params.location_ids.is_empty() {
        let resolver = LocationResolver::new(&fetcher, &params.base_url);
        let locations = resolver
            .resolve(&params.query)
            .await
            .with_context(|| format!("Failed to resolve location '{}'", params.query))?;

        for location in &locations {
            info!(
                "  {} {} ({}) in {}",
                location.id,
                location.name,
                location.location_type,
                location.area_name().unwrap_or("-")
            );
        }

        let Some(first) = locations.first() else {
            bail!("No locations match '{}'", params.query);
        };
        info!("Using location {} ({})", first.name, first.id);
        params.location_ids.push(first.id.to_string());
    }

    let crawler = HemnetCrawler::new(&fetcher, &params.base_url);
    let records = match crawler
        .crawl(&params.location_ids, &params.item_types, &params.sold_age)
        .await
    {
        Ok(records) => records,
        Err(err) => {
            if err.error.is_transport() {
                error!("Hemnet could not be reached: {}", err);
            } else {
                error!("{}", err);
            }
            if !err.partial.is_empty() {
                let json = serde_json::to_string_pretty(&err.partial)?;
                tokio::fs::write(&params.output, json).await?;
                info!("💾 Saved {} partial records to {}", err.partial.len(), params.output);
            }
            return Err(err.into());
        }
    };

    info!("✅ Crawled {} sold properties", records.len());

    for (i, record) in records.iter().enumerate() {
        println!("{}. {} ({} kr, sold {})", i + 1, record.address, record.price, record.sold_at);
        println!(
            "   {} rum, {} kvm, {:.0} kr/kvm",
            record.rooms,
            record.living_size,
            record.price_per_sqm()
        );
        if let Some(area) = &record.area {
            println!("   Area: {}", area);
        }
        if let Some(change) = record.price_change {
            println!("   Price change: {:+}%", change);
        }
    }

    let json = serde_json::to_string_pretty(&records)?;
    tokio::fs::write(&params.output, json).await?;
    info!("💾 Saved all records to {}", params.output);

    Ok(())
}
