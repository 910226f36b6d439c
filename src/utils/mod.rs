pub mod fare;
pub mod jwt;
pub mod validate;
