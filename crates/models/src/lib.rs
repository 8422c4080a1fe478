pub mod errors;
pub mod db;
pub mod company;
pub mod account;
pub mod collection;
pub mod tire;
