pub mod http;
pub mod probe;
pub mod server;
