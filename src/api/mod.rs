pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod utils;
