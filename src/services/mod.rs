pub mod store;
pub mod trips;
