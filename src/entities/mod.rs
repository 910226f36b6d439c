pub mod admin;
pub mod booking;
pub mod customer;
pub mod driver;
