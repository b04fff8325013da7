pub mod catalog;
pub mod picking;
pub mod reports;
