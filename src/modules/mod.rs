pub mod audit;
pub mod auth;
pub mod common;
pub mod dealership;
pub mod lead;
pub mod seo;
pub mod vehicle;
