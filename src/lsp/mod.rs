pub mod backend;
pub mod protocol;
pub mod server;
