//! CLI command implementations

pub mod cache;
pub mod config;
pub mod create;
pub mod proxy;

pub use cache::execute as cache;
pub use config::execute as config;
pub use create::execute as create;
pub use proxy::execute as proxy;
