//! # Catalog Repository
//!
//! Concrete repository implementations (adapters) for the vehicle catalog.
//! This crate provides the database adapter that implements the
//! `VehicleRepository` port.

#[cfg(not(feature = "sqlite"))]
compile_error!("Enable the repo feature: `sqlite`.");

use async_trait::async_trait;
use catalog_types::{RepoError, Vehicle, VehicleId, VehicleQuery, VehicleRepository, VehicleRequest};

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;


/// Repository wrapper selected by feature flags.
pub struct Repo {
    #[cfg(feature = "sqlite")]
    inner: sqlite::SqliteRepo,
}

/// Builds a repository from a database URL.
///
/// This function:
/// 1. Connects to the database
/// 2. Runs migrations to create tables
/// 3. Returns a ready-to-use `Repo`
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("sqlite://data/catalog.db?mode=rwc").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<Repo> {
    Repo::new(database_url).await
}

impl Repo {
    #[cfg(feature = "sqlite")]
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let inner = sqlite::SqliteRepo::new(database_url).await?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepo;

// ─────────────────────────────────────────────────────────────────────────────
// Implement VehicleRepository for Repo (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
#[async_trait]
impl VehicleRepository for Repo {
    async fn create_vehicle(&self, req: VehicleRequest) -> Result<Vehicle, RepoError> {
        self.inner.create_vehicle(req).await
    }

    async fn get_vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, RepoError> {
        self.inner.get_vehicle(id).await
    }

    async fn plate_in_use(
        &self,
        plate: &str,
        except: Option<VehicleId>,
    ) -> Result<bool, RepoError> {
        self.inner.plate_in_use(plate, except).await
    }

    async fn update_vehicle(
        &self,
        id: VehicleId,
        req: VehicleRequest,
    ) -> Result<Option<Vehicle>, RepoError> {
        self.inner.update_vehicle(id, req).await
    }

    async fn soft_delete_vehicle(&self, id: VehicleId) -> Result<bool, RepoError> {
        self.inner.soft_delete_vehicle(id).await
    }

    async fn list_vehicles(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Vehicle>, u64), RepoError> {
        self.inner.list_vehicles(offset, limit).await
    }

    async fn find_vehicles(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, RepoError> {
        self.inner.find_vehicles(query).await
    }

    async fn count_by_brand(&self) -> Result<Vec<(String, u64)>, RepoError> {
        self.inner.count_by_brand().await
    }
}
