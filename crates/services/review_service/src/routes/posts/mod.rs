pub mod authoring;
pub mod detail;
pub mod filter;
pub mod listing;
pub mod model;
pub mod pagination;
