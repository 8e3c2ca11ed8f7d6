pub mod auth;
pub mod compute;
