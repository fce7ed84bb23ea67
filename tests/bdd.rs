use std::{fmt, sync::Arc};

use anyhow::Context;
use cucumber::{given, then, when, World as _};
use tempfile::TempDir;
use trip_planner::{
    db::{init_pool, run_migrations},
    error::StoreError,
    models::trip::Trip,
    services::{store::SqliteTripStore, trips::TripService},
};

#[derive(Debug, cucumber::World, Default)]
struct TripWorld {
    state: Option<TestState>,
    current: Option<Trip>,
    listed: Vec<Trip>,
}

impl TripWorld {
    fn service(&self) -> &TripService {
        &self
            .state
            .as_ref()
            .expect("state must be initialised first")
            .service
    }

    fn current_id(&self) -> i64 {
        self.current.as_ref().expect("a trip must be created first").id
    }
}

struct TestState {
    service: TripService,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let db_path = root.path().join("bdd.sqlite");
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let db = init_pool(&database_url, 4).await?;
        run_migrations(&db).await?;

        let service = TripService::new(Arc::new(SqliteTripStore::new(db)));
        Ok(Self {
            service,
            _root: root,
        })
    }
}

#[given("a fresh trip store")]
async fn given_fresh_store(world: &mut TripWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.current = None;
    world.listed.clear();
}

#[given(regex = r#"^stored trips titled "([^"]+)", "([^"]+)" and "([^"]+)"$"#)]
async fn given_stored_trips(world: &mut TripWorld, first: String, second: String, third: String) {
    for title in [first, second, third] {
        world
            .service()
            .create_trip(Trip::new(1, title))
            .await
            .expect("create trip");
    }
}

#[when(regex = r#"^I create a trip for leader (\d+) titled "([^"]*)" described as "([^"]*)"$"#)]
async fn when_create_trip(world: &mut TripWorld, leader: i64, title: String, description: String) {
    let trip = Trip::new(leader, title).with_description(description);
    let created = world.service().create_trip(trip).await.expect("create trip");
    world.current = Some(created);
}

#[when(regex = r#"^I create a trip with id (\d+) for leader (\d+) titled "([^"]*)"$"#)]
async fn when_create_trip_with_id(world: &mut TripWorld, id: i64, leader: i64, title: String) {
    let mut trip = Trip::new(leader, title);
    trip.id = id;
    let created = world.service().create_trip(trip).await.expect("create trip");
    world.current = Some(created);
}

#[when(regex = r#"^I rename the trip to "([^"]*)"$"#)]
async fn when_rename_trip(world: &mut TripWorld, title: String) {
    let mut trip = world.current.clone().expect("a trip must be created first");
    trip.title = title;
    world.service().update_trip(&trip).await.expect("update trip");
    world.current = Some(trip);
}

#[when("I delete the trip")]
async fn when_delete_trip(world: &mut TripWorld) {
    let id = world.current_id();
    world.service().delete_trip(id).await.expect("delete trip");
}

#[when(regex = r#"^I list trips with title "([^"]*)"$"#)]
async fn when_list_by_title(world: &mut TripWorld, title: String) {
    world.listed = world
        .service()
        .get_trips(Some(title), None, None, None, None, None)
        .await
        .expect("list trips");
}

#[when(regex = r#"^I list trips sorted by "([^"]*)" in "([^"]*)" order$"#)]
async fn when_list_sorted(world: &mut TripWorld, sort_by: String, order: String) {
    world.listed = world
        .service()
        .get_trips(None, None, None, None, Some(sort_by), Some(order))
        .await
        .expect("list trips");
}

#[when(regex = r"^I list trips with limit (\d+)$")]
async fn when_list_with_limit(world: &mut TripWorld, limit: u32) {
    world.listed = world
        .service()
        .get_trips(None, None, Some(limit), None, None, None)
        .await
        .expect("list trips");
}

#[then("the trip has a positive id")]
async fn then_positive_id(world: &mut TripWorld) {
    assert!(world.current_id() > 0);
}

#[then(regex = r"^the trip id is not (\d+)$")]
async fn then_id_is_not(world: &mut TripWorld, id: i64) {
    assert_ne!(world.current_id(), id);
}

#[then(regex = r"^no trip exists with id (\d+)$")]
async fn then_no_trip_with_id(world: &mut TripWorld, id: i64) {
    let result = world.service().get_trip_by_id(id).await;
    assert!(matches!(result, Err(StoreError::NotFound(missing)) if missing == id));
}

#[then(
    regex = r#"^fetching the trip returns leader (\d+), title "([^"]*)" and description "([^"]*)"$"#
)]
async fn then_fetch_returns(world: &mut TripWorld, leader: i64, title: String, description: String) {
    let id = world.current_id();
    let trip = world.service().get_trip_by_id(id).await.expect("get trip");
    assert_eq!(trip.id, id);
    assert_eq!(trip.leader_id, leader);
    assert_eq!(trip.title, title);
    assert_eq!(trip.description.as_deref(), Some(description.as_str()));
}

#[then("fetching the trip reports not found")]
async fn then_fetch_not_found(world: &mut TripWorld) {
    let id = world.current_id();
    let result = world.service().get_trip_by_id(id).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[then(regex = r"^updating trip (\d+) reports not found$")]
async fn then_update_not_found(world: &mut TripWorld, id: i64) {
    let mut trip = Trip::new(1, "ghost");
    trip.id = id;
    let result = world.service().update_trip(&trip).await;
    assert!(matches!(result, Err(StoreError::NotFound(missing)) if missing == id));
    assert!(world.service().get_trip_by_id(id).await.is_err());
}

#[then(regex = r"^deleting trip (\d+) reports not found$")]
async fn then_delete_not_found(world: &mut TripWorld, id: i64) {
    let result = world.service().delete_trip(id).await;
    assert!(matches!(result, Err(StoreError::NotFound(missing)) if missing == id));
}

#[then(regex = r#"^the listed titles are "([^"]*)"$"#)]
async fn then_listed_titles(world: &mut TripWorld, expected: String) {
    let titles: Vec<&str> = world.listed.iter().map(|t| t.title.as_str()).collect();
    let expected: Vec<&str> = expected.split(", ").collect();
    assert_eq!(titles, expected);
}

#[then("no trips are listed")]
async fn then_nothing_listed(world: &mut TripWorld) {
    assert!(world.listed.is_empty());
}

#[tokio::main]
async fn main() {
    TripWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
