//! Vehicle Catalog Application Service
//!
//! Orchestrates domain operations through the repository and rate ports.
//! Contains NO infrastructure logic - pure business orchestration.

use std::collections::BTreeMap;

use catalog_types::{
    AppError, ExchangeRate, Page, PageRequest, PatchVehicleRequest, RateProvider, SearchFilter,
    Vehicle, VehicleId, VehicleRepository, VehicleRequest,
};

use crate::filter::FilterBuilder;

/// Application service for catalog operations.
///
/// Generic over `R: VehicleRepository` and `P: RateProvider` - both adapters
/// are injected at compile time, so tests run against in-memory fakes.
pub struct VehicleService<R: VehicleRepository, P: RateProvider> {
    repo: R,
    filters: FilterBuilder<P>,
}

impl<R: VehicleRepository, P: RateProvider> VehicleService<R, P> {
    /// Creates a new catalog service with the given repository and rate provider.
    pub fn new(repo: R, rates: P) -> Self {
        Self {
            repo,
            filters: FilterBuilder::new(rates),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Vehicle Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a new vehicle.
    pub async fn create_vehicle(&self, req: VehicleRequest) -> Result<Vehicle, AppError> {
        let req = req.normalized()?;
        self.ensure_plate_free(&req.plate, None).await?;

        let vehicle = self.repo.create_vehicle(req).await?;
        tracing::info!(vehicle_id = %vehicle.id, plate = %vehicle.plate, "vehicle registered");
        Ok(vehicle)
    }

    /// Gets a vehicle by ID.
    pub async fn get_vehicle(&self, id: VehicleId) -> Result<Vehicle, AppError> {
        self.repo
            .get_vehicle(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Vehicle {}", id))))
    }

    /// Lists vehicles one page at a time, oldest first.
    pub async fn list_vehicles(&self, page: PageRequest) -> Result<Page<Vehicle>, AppError> {
        let (page, size) = page.resolve();
        let offset = u64::from(page) * u64::from(size);

        let (items, total) = self.repo.list_vehicles(offset, u64::from(size)).await?;
        Ok(Page::new(items, page, size, total))
    }

    /// Replaces every mutable field of a vehicle.
    pub async fn update_vehicle(
        &self,
        id: VehicleId,
        req: VehicleRequest,
    ) -> Result<Vehicle, AppError> {
        self.get_vehicle(id).await?;
        self.replace(id, req).await
    }

    /// Updates any subset of a vehicle's fields.
    pub async fn patch_vehicle(
        &self,
        id: VehicleId,
        patch: PatchVehicleRequest,
    ) -> Result<Vehicle, AppError> {
        let current = self.get_vehicle(id).await?;
        self.replace(id, patch.apply_to(&current)).await
    }

    /// Soft-deletes a vehicle.
    pub async fn delete_vehicle(&self, id: VehicleId) -> Result<(), AppError> {
        if !self.repo.soft_delete_vehicle(id).await? {
            return Err(AppError::NotFound(format!("Vehicle {}", id)));
        }
        tracing::info!(vehicle_id = %id, "vehicle deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Search & Reports
    // ─────────────────────────────────────────────────────────────────────────────

    /// Searches live vehicles; price bounds are in local currency.
    pub async fn search(&self, filter: SearchFilter) -> Result<Vec<Vehicle>, AppError> {
        let query = self.filters.build(filter).await?;
        self.repo.find_vehicles(&query).await.map_err(Into::into)
    }

    /// Number of live vehicles per brand.
    pub async fn count_by_brand(&self) -> Result<BTreeMap<String, u64>, AppError> {
        let counts = self.repo.count_by_brand().await?;
        Ok(counts.into_iter().collect())
    }

    /// The rate price-filtered searches would use right now.
    pub async fn current_rate(&self) -> Result<ExchangeRate, AppError> {
        self.filters.rates().get_rate().await.map_err(Into::into)
    }

    /// Writes a full replacement for a vehicle known to exist.
    async fn replace(&self, id: VehicleId, req: VehicleRequest) -> Result<Vehicle, AppError> {
        let req = req.normalized()?;
        self.ensure_plate_free(&req.plate, Some(id)).await?;

        self.repo
            .update_vehicle(id, req)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Vehicle {}", id))))
    }

    async fn ensure_plate_free(
        &self,
        plate: &str,
        except: Option<VehicleId>,
    ) -> Result<(), AppError> {
        if self.repo.plate_in_use(plate, except).await? {
            return Err(AppError::Conflict(format!(
                "Plate {} is already registered",
                plate
            )));
        }
        Ok(())
    }
}
