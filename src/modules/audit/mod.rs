pub mod dto;
pub mod repository;
pub mod routes;
pub mod snapshot;
