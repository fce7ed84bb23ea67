use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use serde_with::{serde_as, NoneAsEmptyString};

use crate::{error::AppError, models::trip::Trip, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route(
            "/trips/:id",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct ListParams {
    title: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    leader_id: Option<i64>,
    limit: Option<u32>,
    offset: Option<u32>,
    #[serde(rename = "sortBy", alias = "sort_by")]
    sort_by: Option<String>,
    order: Option<String>,
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest("invalid trip ID".into()))
}

fn parse_body(body: Result<Json<Trip>, JsonRejection>) -> Result<Trip, AppError> {
    let Json(trip) = body.map_err(|err| AppError::BadRequest(err.body_text()))?;
    if trip.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    Ok(trip)
}

async fn create_trip(
    State(state): State<AppState>,
    body: Result<Json<Trip>, JsonRejection>,
) -> Result<Json<Trip>, AppError> {
    let trip = parse_body(body)?;
    let created = state.trips.create_trip(trip).await?;
    Ok(Json(created))
}

async fn list_trips(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let Query(params) = params.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let trips = state
        .trips
        .get_trips(
            params.title,
            params.leader_id,
            params.limit,
            params.offset,
            params.sort_by,
            params.order,
        )
        .await?;
    Ok(Json(trips))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    let id = parse_id(&raw_id)?;
    let trip = state.trips.get_trip_by_id(id).await?;
    Ok(Json(trip))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<Trip>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&raw_id)?;
    let mut trip = parse_body(body)?;
    trip.id = id;
    state.trips.update_trip(&trip).await?;
    Ok(Json(json!({ "message": "Trip updated successfully" })))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&raw_id)?;
    state.trips.delete_trip(id).await?;
    Ok(Json(json!({ "message": "Trip deleted successfully" })))
}
