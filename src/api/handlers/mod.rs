// API handlers - thin HTTP orchestration layer
// Handlers only deal with HTTP concerns:
// 1. Extract and validate parameters from the request
// 2. Call domain logic
// 3. Transform the domain result to an HTTP response

pub mod ranking;
pub mod users;

pub use ranking::{group_ranking_handler, user_ranking_handler};
pub use users::{
    delete_user_handler, get_user_handler, list_group_users_handler, register_user_handler,
};
