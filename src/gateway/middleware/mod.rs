mod client_ip;
mod cors;

pub use client_ip::extract_client_ip;
pub use cors::cors_layer;
