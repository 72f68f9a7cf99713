pub mod credentials;
mod endpoints;
pub mod jwt;
pub mod service;
