pub mod dynamodb;
pub mod errors;
pub mod memory;
pub mod store;

pub use dynamodb::DynamoUserStore;
pub use errors::*;
pub use memory::InMemoryUserStore;
pub use store::UserStore;
