pub mod bidding;
pub mod config;
pub mod contact;
pub mod database;
pub mod error;
pub mod handlers;
pub mod http;
pub mod ledger;
pub mod query;
pub mod router;
pub mod state;
