pub mod api;
pub mod app;
pub mod cli;
pub mod database;
pub mod endpoints;
pub mod errors;
pub mod http;
pub mod logging;
pub mod resources;
pub mod routes;
pub mod store;
pub mod threadpool;
