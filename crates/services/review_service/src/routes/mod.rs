pub mod catalog;
pub mod comments;
pub mod health_check;
pub mod posts;
pub mod session;
pub mod users;
