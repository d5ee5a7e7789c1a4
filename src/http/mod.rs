pub mod encoding;
pub mod proxy;
pub mod server;
