pub mod api;
pub mod internal;
pub mod record;


pub use api::*;
pub use internal::*;
pub use record::*;
