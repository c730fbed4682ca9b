pub mod required_tags;
pub mod types;
