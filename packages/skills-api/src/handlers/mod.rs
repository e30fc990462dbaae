//! HTTP request handlers for the skills API.

pub mod request_utils;
pub mod response;
mod skill_handlers;

pub use response::{error_response, success_message, success_response, ApiResponse, ResponseStatus};
pub use skill_handlers::{
    create_skill, delete_skill, get_skill, list_skills, patch_skill, replace_skill,
};
