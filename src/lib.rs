pub mod account;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod graphql;
pub mod session;
pub mod state;
pub mod telemetry;
