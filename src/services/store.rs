use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, warn};

use crate::{
    db::DbPool,
    error::{StoreError, StoreResult},
    models::trip::{fold_title, Pagination, SortKey, Trip, TripFilter, TripSort},
};

const SELECT_TRIPS: &str = "SELECT id, leader_id, title, description FROM trips";

/// Futures returned by these methods may be dropped at any point; dropping one
/// aborts the in-flight query.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Inserts `trip` and returns the id assigned by the backend. `trip.id` is ignored.
    async fn create(&self, trip: &Trip) -> StoreResult<i64>;

    /// Lists trips matching every present filter. Sort and pagination input is
    /// validated and defaulted here.
    async fn list(
        &self,
        filter: &TripFilter,
        page: Pagination,
        sort: &TripSort,
    ) -> StoreResult<Vec<Trip>>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Trip>;

    /// Replaces every mutable field of the row with `trip.id`.
    async fn update(&self, trip: &Trip) -> StoreResult<()>;

    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// Releases backend resources. Safe to call more than once.
    async fn close(&self);
}

#[derive(Clone)]
pub struct SqliteTripStore {
    pool: DbPool,
}

impl SqliteTripStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn build_list_query(
    filter: &TripFilter,
    page: Pagination,
    sort: &TripSort,
) -> QueryBuilder<'static, Sqlite> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_TRIPS);
    query.push(" WHERE 1=1");

    if let Some(pattern) = filter.title_pattern() {
        query
            .push(" AND title_folded LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\'");
    }

    if let Some(leader_id) = filter.leader_id {
        query.push(" AND leader_id = ").push_bind(leader_id);
    }

    let (key, order) = sort.resolve();
    query
        .push(" ORDER BY ")
        .push(key.column())
        .push(" ")
        .push(order.keyword());
    if key != SortKey::Id {
        query.push(", id ").push(order.keyword());
    }

    query
        .push(" LIMIT ")
        .push_bind(i64::from(page.limit()))
        .push(" OFFSET ")
        .push_bind(i64::from(page.offset()));

    query
}

fn log_failure(op: &str, err: StoreError) -> StoreError {
    if let StoreError::Storage(inner) = &err {
        warn!("{op} failed: {inner}");
    }
    err
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn create(&self, trip: &Trip) -> StoreResult<i64> {
        let result = sqlx::query(
            "INSERT INTO trips (leader_id, title, title_folded, description) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(trip.leader_id)
        .bind(&trip.title)
        .bind(fold_title(&trip.title))
        .bind(&trip.description)
        .execute(&self.pool)
        .await
        .map_err(|err| log_failure("create trip", err.into()))?;
        let id = result.last_insert_rowid();
        debug!(id, leader_id = trip.leader_id, "trip inserted");
        Ok(id)
    }

    async fn list(
        &self,
        filter: &TripFilter,
        page: Pagination,
        sort: &TripSort,
    ) -> StoreResult<Vec<Trip>> {
        let mut query = build_list_query(filter, page, sort);
        debug!(sql = query.sql(), "listing trips");
        let trips = query
            .build_query_as::<Trip>()
            .fetch_all(&self.pool)
            .await
            .map_err(|err| log_failure("list trips", err.into()))?;
        Ok(trips)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            "SELECT id, leader_id, title, description FROM trips WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| log_failure("get trip", err.into()))?;
        trip.ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, trip: &Trip) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE trips SET leader_id = ?1, title = ?2, title_folded = ?3, description = ?4 \
             WHERE id = ?5",
        )
        .bind(trip.leader_id)
        .bind(&trip.title)
        .bind(fold_title(&trip.title))
        .bind(&trip.description)
        .bind(trip.id)
        .execute(&self.pool)
        .await
        .map_err(|err| log_failure("update trip", err.into()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(trip.id));
        }
        debug!(id = trip.id, "trip updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| log_failure("delete trip", err.into()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(id, "trip deleted");
        Ok(())
    }

    async fn close(&self) {
        if !self.pool.is_closed() {
            debug!("closing trip store");
        }
        self.pool.close().await;
    }
}
