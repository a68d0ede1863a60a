//! Repository port trait.
//!
//! The catalog store is keyed by [`VehicleId`] and owns soft-delete: a
//! deleted vehicle is invisible to every read below, and its plate may be
//! reused by a new listing.

use crate::domain::{Vehicle, VehicleId, VehicleQuery};
use crate::dto::VehicleRequest;
use crate::error::RepoError;

#[async_trait::async_trait]
pub trait VehicleRepository: Send + Sync + 'static {
    /// Inserts a new vehicle. The request is assumed to be validated.
    async fn create_vehicle(&self, req: VehicleRequest) -> Result<Vehicle, RepoError>;

    /// Gets a live (not deleted) vehicle by ID.
    async fn get_vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, RepoError>;

    /// Returns true if a live vehicle other than `except` carries `plate`.
    async fn plate_in_use(&self, plate: &str, except: Option<VehicleId>)
    -> Result<bool, RepoError>;

    /// Replaces the mutable fields of a live vehicle.
    async fn update_vehicle(
        &self,
        id: VehicleId,
        req: VehicleRequest,
    ) -> Result<Option<Vehicle>, RepoError>;

    /// Marks a vehicle deleted. Returns false if it was absent or already deleted.
    async fn soft_delete_vehicle(&self, id: VehicleId) -> Result<bool, RepoError>;

    /// One page of live vehicles plus the total count of live vehicles.
    async fn list_vehicles(&self, offset: u64, limit: u64)
    -> Result<(Vec<Vehicle>, u64), RepoError>;

    /// All live vehicles matching every clause of `query`, oldest first.
    async fn find_vehicles(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, RepoError>;

    /// Number of live vehicles per brand.
    async fn count_by_brand(&self) -> Result<Vec<(String, u64)>, RepoError>;
}
