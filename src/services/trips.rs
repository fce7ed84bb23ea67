use std::sync::Arc;

use tracing::info;

use crate::{
    error::StoreResult,
    models::trip::{Pagination, Trip, TripFilter, TripSort},
    services::store::TripStore,
};

/// Orchestrates trip operations on top of a [`TripStore`]. Store errors pass
/// through unchanged.
#[derive(Clone)]
pub struct TripService {
    store: Arc<dyn TripStore>,
}

impl TripService {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Persists `trip` and returns it with the store-assigned id. Any id set by
    /// the caller is discarded.
    pub async fn create_trip(&self, mut trip: Trip) -> StoreResult<Trip> {
        trip.id = 0;
        trip.id = self.store.create(&trip).await?;
        info!(id = trip.id, leader_id = trip.leader_id, "trip created");
        Ok(trip)
    }

    pub async fn get_trips(
        &self,
        title: Option<String>,
        leader_id: Option<i64>,
        limit: Option<u32>,
        offset: Option<u32>,
        sort_by: Option<String>,
        order: Option<String>,
    ) -> StoreResult<Vec<Trip>> {
        let filter = TripFilter { title, leader_id };
        let page = Pagination { limit, offset };
        let sort = TripSort { sort_by, order };
        self.store.list(&filter, page, &sort).await
    }

    pub async fn get_trip_by_id(&self, id: i64) -> StoreResult<Trip> {
        self.store.get_by_id(id).await
    }

    /// Replaces the trip addressed by `trip.id`. The caller sets the id.
    pub async fn update_trip(&self, trip: &Trip) -> StoreResult<()> {
        self.store.update(trip).await?;
        info!(id = trip.id, "trip updated");
        Ok(())
    }

    pub async fn delete_trip(&self, id: i64) -> StoreResult<()> {
        self.store.delete(id).await?;
        info!(id, "trip deleted");
        Ok(())
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}
