pub mod movie;
pub mod rating;
pub mod schema;
pub mod table;
