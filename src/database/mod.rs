pub mod mongodb;
pub mod store;
pub mod tour_db;
