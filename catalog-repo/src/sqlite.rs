//! SQLite repository adapter.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use catalog_types::domain::price::{bound_to_cents, from_cents, to_cents};
use catalog_types::{
    FilterClause, RepoError, Vehicle, VehicleId, VehicleQuery, VehicleRepository,
    VehicleRequest,
};

use crate::types::{DbBrandCount, DbVehicle, VEHICLE_COLUMNS, format_timestamp};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // Ensure on-disk SQLite target directory exists.
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory
                && let Some(parent) = std::path::Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::debug!(in_memory, "sqlite catalog store ready");
        Ok(repo)
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_vehicles.sql");
        sqlx::raw_sql(ddl)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

/// Unique-index violations become conflicts; everything else is a database error.
fn write_error(e: sqlx::Error, plate: &str) -> RepoError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        RepoError::Conflict(format!("Plate {} is already registered", plate))
    } else {
        db_error(e)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl VehicleRepository for SqliteRepo {
    async fn create_vehicle(&self, req: VehicleRequest) -> Result<Vehicle, RepoError> {
        let price_cents = to_cents(req.price_usd)?;

        let id = Uuid::new_v4();
        let now = Utc::now().trunc_subsecs(6);
        let stamp = format_timestamp(now);

        sqlx::query(
            r#"INSERT INTO vehicles (id, name, brand, model, year, color, plate, price_cents, sold, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.brand)
        .bind(&req.model)
        .bind(req.year)
        .bind(&req.color)
        .bind(&req.plate)
        .bind(price_cents)
        .bind(req.sold)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &req.plate))?;

        Ok(Vehicle {
            id: VehicleId::from_uuid(id),
            name: req.name,
            brand: req.brand,
            model: req.model,
            year: req.year,
            color: req.color,
            plate: req.plate,
            price_usd: from_cents(price_cents),
            sold: req.sold,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, RepoError> {
        let sql = format!(
            "SELECT {} FROM vehicles WHERE id = ? AND deleted = 0",
            VEHICLE_COLUMNS
        );
        let row: Option<DbVehicle> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(DbVehicle::into_domain).transpose()
    }

    async fn plate_in_use(
        &self,
        plate: &str,
        except: Option<VehicleId>,
    ) -> Result<bool, RepoError> {
        let except = except.map(|id| id.to_string());
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM vehicles
               WHERE plate = ? AND deleted = 0 AND (? IS NULL OR id <> ?)"#,
        )
        .bind(plate)
        .bind(&except)
        .bind(&except)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn update_vehicle(
        &self,
        id: VehicleId,
        req: VehicleRequest,
    ) -> Result<Option<Vehicle>, RepoError> {
        let price_cents = to_cents(req.price_usd)?;
        let stamp = format_timestamp(Utc::now().trunc_subsecs(6));

        let result = sqlx::query(
            r#"UPDATE vehicles
               SET name = ?, brand = ?, model = ?, year = ?, color = ?, plate = ?,
                   price_cents = ?, sold = ?, updated_at = ?
               WHERE id = ? AND deleted = 0"#,
        )
        .bind(&req.name)
        .bind(&req.brand)
        .bind(&req.model)
        .bind(req.year)
        .bind(&req.color)
        .bind(&req.plate)
        .bind(price_cents)
        .bind(req.sold)
        .bind(&stamp)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &req.plate))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_vehicle(id).await
    }

    async fn soft_delete_vehicle(&self, id: VehicleId) -> Result<bool, RepoError> {
        let stamp = format_timestamp(Utc::now());
        let result = sqlx::query(
            r#"UPDATE vehicles SET deleted = 1, deleted_at = ? WHERE id = ? AND deleted = 0"#,
        )
        .bind(&stamp)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_vehicles(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Vehicle>, u64), RepoError> {
        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM vehicles WHERE deleted = 0"#)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let sql = format!(
            "SELECT {} FROM vehicles WHERE deleted = 0 ORDER BY created_at, id LIMIT ? OFFSET ?",
            VEHICLE_COLUMNS
        );
        let rows: Vec<DbVehicle> = sqlx::query_as(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let vehicles = rows
            .into_iter()
            .map(DbVehicle::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((vehicles, u64::try_from(total).unwrap_or_default()))
    }

    async fn find_vehicles(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, RepoError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM vehicles WHERE deleted = 0",
            VEHICLE_COLUMNS
        ));

        for clause in query.clauses() {
            match clause {
                FilterClause::BrandEq(brand) => {
                    qb.push(" AND brand = ").push_bind(brand.clone());
                }
                FilterClause::YearEq(year) => {
                    qb.push(" AND year = ").push_bind(*year);
                }
                FilterClause::ColorEq(color) => {
                    qb.push(" AND color = ").push_bind(color.clone());
                }
                // Bounds past the cent range either match every row or none.
                FilterClause::MinPrice(min) => match bound_to_cents(*min) {
                    Some(cents) => {
                        qb.push(" AND price_cents >= ").push_bind(cents);
                    }
                    None if min.is_sign_positive() => {
                        qb.push(" AND 0 = 1");
                    }
                    None => {}
                },
                FilterClause::MaxPrice(max) => match bound_to_cents(*max) {
                    Some(cents) => {
                        qb.push(" AND price_cents <= ").push_bind(cents);
                    }
                    None if max.is_sign_positive() => {}
                    None => {
                        qb.push(" AND 0 = 1");
                    }
                },
            }
        }
        qb.push(" ORDER BY created_at, id");

        let rows: Vec<DbVehicle> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(DbVehicle::into_domain).collect()
    }

    async fn count_by_brand(&self) -> Result<Vec<(String, u64)>, RepoError> {
        let rows: Vec<DbBrandCount> = sqlx::query_as(
            r#"SELECT brand, COUNT(*) AS total FROM vehicles
               WHERE deleted = 0 GROUP BY brand ORDER BY brand"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(DbBrandCount::into_pair).collect())
    }
}
