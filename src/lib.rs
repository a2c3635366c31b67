pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod password;
    pub mod refresh;
    pub mod token;
}

pub mod models {
    pub mod session;
    pub mod user;
}

pub mod repositories;

pub mod services {
    pub mod auth;
}

pub mod handlers {
    pub mod auth;
    pub mod users;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
