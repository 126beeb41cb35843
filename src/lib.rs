#![doc = "The `kanban_api` library crate."]
#![doc = ""]
#![doc = "Domain models, the user and board stores (in-memory and SQLite), the auth"]
#![doc = "and board services, JWT authentication, middleware, routing and error"]
#![doc = "handling for the kanban API. The binary (`main.rs`) wires them together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

// The App is assembled in main.rs; the integration tests build the same
// middleware stack inline.
