pub mod auth;
pub mod expenses;
pub mod handlers;
pub mod middleware;
pub mod routes;
