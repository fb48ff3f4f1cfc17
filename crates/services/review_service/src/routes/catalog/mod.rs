pub mod genres;
pub mod model;
pub mod navigation;
pub mod publishers;
