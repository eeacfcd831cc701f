pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;
