pub mod core;
pub mod flow;
pub mod http;
pub mod provider;
pub mod registry;
pub mod state;
pub mod util;
