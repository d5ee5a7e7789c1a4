pub mod oauth;
pub mod proxy;
