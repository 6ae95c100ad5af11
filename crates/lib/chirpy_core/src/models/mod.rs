//! Domain models shared by the store and the API layer.

pub mod auth;
pub mod chirps;
pub mod users;
