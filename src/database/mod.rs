pub mod db;
pub mod error;
pub mod models;
pub mod models_helpers;
pub mod pagination;
pub mod schema;
