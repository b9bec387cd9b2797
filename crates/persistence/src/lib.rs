//! Persistence layer for the RSVP service.
//!
//! This crate contains the data service backends:
//! - Hosted REST table client (PostgREST dialect)
//! - Direct PostgreSQL access: pool, entities, repositories, migrations
//! - Call duration metrics shared by both

pub mod db;
pub mod entities;
pub mod metrics;
pub mod postgres;
pub mod repositories;
pub mod rest;

pub use postgres::PgDataService;
pub use rest::{RestConfig, RestDataService};
