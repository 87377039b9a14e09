pub mod auth;
pub mod errors;
pub mod response;
pub mod routes;
