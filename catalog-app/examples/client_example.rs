//! Client example demonstrating a full catalog flow against a local server.
//!
//! Rates come from a fixed provider so the example runs offline.
//!
//! Run with: cargo run -p catalog-app --example client_example

use std::net::SocketAddr;
use std::str::FromStr;

use catalog_client::CatalogClient;
use catalog_hex::{VehicleService, inbound::HttpServer};
use catalog_repo::build_repo;
use catalog_types::{
    CurrencyPair, ExchangeRate, PatchVehicleRequest, RateProvider, SearchFilter, VehicleRequest,
};
use exchange_rates::RateError;
use rust_decimal::Decimal;
use tempfile::tempdir;
use tokio::net::TcpListener;

/// 1 USD = 5.00 BRL, always.
struct FixedRate;

#[async_trait::async_trait]
impl RateProvider for FixedRate {
    async fn get_rate(&self) -> Result<ExchangeRate, RateError> {
        Ok(ExchangeRate::new(
            Decimal::from(5),
            CurrencyPair::USD_BRL,
            "fixed",
        ))
    }
}

fn listing(brand: &str, model: &str, year: i32, plate: &str, price: &str) -> VehicleRequest {
    VehicleRequest {
        name: format!("{} {} {}", brand, model, year),
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        color: "Silver".to_string(),
        plate: plate.to_string(),
        price_usd: Decimal::from_str(price).unwrap_or_default(),
        sold: false,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("catalog.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on {addr}...");
    println!("   Database: {db_url}");

    let repo = build_repo(&db_url).await?;
    let router = HttpServer::new(VehicleService::new(repo, FixedRate)).router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server stopped: {e}");
        }
    });

    let base_url = format!("http://{addr}");
    let reader = CatalogClient::new(&base_url);
    let admin = CatalogClient::new(&base_url).with_role("admin");

    println!("✅ Server health: {}", reader.health().await?);

    // Writes need the admin role
    let refused = reader
        .create_vehicle(&listing("Fiat", "Uno", 2010, "FIA0001", "3500"))
        .await;
    println!("✅ Write refused without role: {}", refused.is_err());

    let corolla = admin
        .create_vehicle(&listing("Toyota", "Corolla", 2022, "TOY-2022", "25000"))
        .await?;
    admin
        .create_vehicle(&listing("Toyota", "Yaris", 2022, "TOY-2023", "18000"))
        .await?;
    admin
        .create_vehicle(&listing("Honda", "Civic", 2021, "HON-2021", "22000"))
        .await?;
    println!("✅ Registered {} (plate {})", corolla.name, corolla.plate);

    // Search in BRL; the server converts with the current rate
    let rate = reader.exchange_rate().await?;
    println!("💱 Rate: {} {} ({})", rate.pair, rate.rate, rate.source);

    let hits = reader
        .search(&SearchFilter {
            brand: Some("Toyota".into()),
            min_price: Some(Decimal::from(100_000)),
            max_price: Some(Decimal::from(150_000)),
            ..Default::default()
        })
        .await?;
    println!("🔎 Toyotas between R$100,000 and R$150,000:");
    for v in &hits {
        println!("   - {} at US${}", v.name, v.price_usd);
    }

    // Mark as sold, then retire the listing
    let sold = admin
        .patch_vehicle(
            corolla.id,
            &PatchVehicleRequest {
                sold: Some(true),
                ..Default::default()
            },
        )
        .await?;
    println!("✅ {} sold: {}", sold.name, sold.sold);

    admin.delete_vehicle(corolla.id).await?;
    println!("🗑️  Deleted {}", corolla.id);

    println!("\n📋 Listings per brand:");
    for (brand, count) in reader.brand_report().await? {
        println!("   - {brand}: {count}");
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
