pub mod error_codes;
pub mod extractors;
pub mod rate_limit;
pub mod responses;
pub mod validators;
