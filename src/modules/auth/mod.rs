pub mod csrf;
pub mod dto;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod session;
