pub mod server;
pub use server::*;

pub mod request;
pub use request::{parse_request, Request};

pub mod response;
pub use response::*;

pub mod client;
pub use client::*;
