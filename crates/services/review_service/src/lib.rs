pub mod db_error;
pub mod genre_index;
pub mod routes;
pub mod schema;
pub mod sql_functions;
pub mod startup;
