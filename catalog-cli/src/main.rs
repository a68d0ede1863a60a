//! Catalog CLI
//!
//! Command-line interface for the Vehicle Catalog API.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use catalog_client::CatalogClient;
use catalog_types::{PageRequest, PatchVehicleRequest, SearchFilter, VehicleId, VehicleRequest};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about = "Vehicle Catalog API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Catalog API
    #[arg(long, env = "CATALOG_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Role sent to the API (`admin` is required for writes)
    #[arg(long, env = "CATALOG_ROLE")]
    role: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vehicle operations
    Vehicle {
        #[command(subcommand)]
        action: VehicleCommands,
    },
    /// Show the exchange rate used for price searches
    Rate,
    /// Vehicle count per brand
    Report,
    /// Check API health
    Health,
}

/// Every field of a vehicle listing.
#[derive(Args)]
struct VehicleFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    brand: String,
    #[arg(long)]
    model: String,
    #[arg(long)]
    year: i32,
    #[arg(long)]
    color: String,
    #[arg(long)]
    plate: String,
    /// Price in USD
    #[arg(long)]
    price: Decimal,
    #[arg(long, default_value_t = false)]
    sold: bool,
}

impl From<VehicleFields> for VehicleRequest {
    fn from(f: VehicleFields) -> Self {
        VehicleRequest {
            name: f.name,
            brand: f.brand,
            model: f.model,
            year: f.year,
            color: f.color,
            plate: f.plate,
            price_usd: f.price,
            sold: f.sold,
        }
    }
}

#[derive(Subcommand)]
enum VehicleCommands {
    /// Register a new vehicle
    Create {
        #[command(flatten)]
        fields: VehicleFields,
    },
    /// Get vehicle details
    Get {
        /// Vehicle ID (UUID)
        id: String,
    },
    /// List vehicles page by page
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
    },
    /// Search vehicles (prices in BRL)
    Search {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        min_price: Option<Decimal>,
        #[arg(long)]
        max_price: Option<Decimal>,
    },
    /// Replace every field of a vehicle
    Update {
        /// Vehicle ID (UUID)
        id: String,
        #[command(flatten)]
        fields: VehicleFields,
    },
    /// Change some fields of a vehicle
    Patch {
        /// Vehicle ID (UUID)
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        plate: Option<String>,
        /// Price in USD
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        sold: Option<bool>,
    },
    /// Delete a vehicle
    Delete {
        /// Vehicle ID (UUID)
        id: String,
    },
}

fn parse_vehicle_id(s: &str) -> Result<VehicleId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid vehicle ID: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut client = CatalogClient::new(&cli.api_url);
    if let Some(role) = cli.role {
        client = client.with_role(role);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }
        Commands::Rate => {
            let rate = client.exchange_rate().await?;
            println!("{}", serde_json::to_string_pretty(&rate)?);
        }
        Commands::Report => {
            let report = client.brand_report().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Vehicle { action } => match action {
            VehicleCommands::Create { fields } => {
                let vehicle = client.create_vehicle(&fields.into()).await?;
                println!("{}", serde_json::to_string_pretty(&vehicle)?);
            }
            VehicleCommands::Get { id } => {
                let vehicle = client.get_vehicle(parse_vehicle_id(&id)?).await?;
                println!("{}", serde_json::to_string_pretty(&vehicle)?);
            }
            VehicleCommands::List { page, size } => {
                let page = client.list_vehicles(PageRequest { page, size }).await?;
                println!("{}", serde_json::to_string_pretty(&page)?);
            }
            VehicleCommands::Search {
                brand,
                year,
                color,
                min_price,
                max_price,
            } => {
                let filter = SearchFilter {
                    brand,
                    year,
                    color,
                    min_price,
                    max_price,
                };
                let vehicles = client.search(&filter).await?;
                println!("{}", serde_json::to_string_pretty(&vehicles)?);
            }
            VehicleCommands::Update { id, fields } => {
                let vehicle = client
                    .update_vehicle(parse_vehicle_id(&id)?, &fields.into())
                    .await?;
                println!("{}", serde_json::to_string_pretty(&vehicle)?);
            }
            VehicleCommands::Patch {
                id,
                name,
                brand,
                model,
                year,
                color,
                plate,
                price,
                sold,
            } => {
                let patch = PatchVehicleRequest {
                    name,
                    brand,
                    model,
                    year,
                    color,
                    plate,
                    price_usd: price,
                    sold,
                };
                let vehicle = client.patch_vehicle(parse_vehicle_id(&id)?, &patch).await?;
                println!("{}", serde_json::to_string_pretty(&vehicle)?);
            }
            VehicleCommands::Delete { id } => {
                let id = parse_vehicle_id(&id)?;
                client.delete_vehicle(id).await?;
                println!("✓ Vehicle {} deleted", id);
            }
        },
    }

    Ok(())
}
