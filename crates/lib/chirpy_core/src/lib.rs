//! # chirpy_core
//!
//! Core domain logic for Chirpy: the credential and session authority,
//! domain models and the persistence traits with their implementations.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;
