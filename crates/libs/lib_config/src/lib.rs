pub mod config {
    pub mod configuration;
}

pub mod db {
    pub mod db;
}

pub mod session {
    pub mod notice;
    pub mod redis;
}
