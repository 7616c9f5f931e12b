// ABOUTME: Core types and utilities shared across Tutor packages
// ABOUTME: Data directory resolution and row id generation

pub mod constants;
pub mod utils;

pub use constants::tutor_dir;
pub use utils::generate_row_id;
