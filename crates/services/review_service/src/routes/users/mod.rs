pub mod crud;
pub mod model;
pub mod validate_user;
