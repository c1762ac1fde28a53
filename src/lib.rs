//! User-account REST service: registration, login and CRUD over a single
//! `users` resource, with argon2 credential hashing and stateless JWT
//! sessions guarding the mutating routes.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod users;
