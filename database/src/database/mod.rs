pub mod database;
pub mod request_manager;
pub mod table;
pub mod transaction;
pub mod utils;
