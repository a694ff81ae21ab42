//! corpdir - company directory service with geo-restricted writes.
//!
//! A small HTTP API for managing company records. Reads are open;
//! creates and deletes are limited to callers located in a configured
//! set of countries, resolved through an IP geolocation service.

pub mod cli;
pub mod companies;
pub mod config;
pub mod context;
pub mod countries;
pub mod geoip;
pub mod models;
pub mod server;
pub mod store;
pub mod validate;
