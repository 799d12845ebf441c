//! Event catalogue: browse, search and edit events kept by an external REST
//! data service.

pub mod composer;
pub mod config;
pub mod filter;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod mutation;
pub mod routes;
pub mod utils;
pub mod views;

#[cfg(test)]
mod testing;
