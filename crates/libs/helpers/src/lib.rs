pub mod auth_jwt {
    pub mod auth;
}

pub mod slug {
    pub mod slug;
}

pub mod validations {
    pub mod validations;
}
