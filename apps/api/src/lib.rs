pub mod config;
pub mod errors;
pub mod extension;
pub mod extraction;
pub mod files;
pub mod identity;
pub mod models;
pub mod normalize;
pub mod records;
pub mod routes;
pub mod state;
pub mod store;
pub mod views;

#[cfg(test)]
mod test_support;
