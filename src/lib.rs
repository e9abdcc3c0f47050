pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod models;
pub mod payments;
pub mod realtime;
pub mod search;
pub mod storage;

pub use db::create_pool;
