pub mod achievements;
pub mod completion;
pub mod dto;
pub mod profile_service;
pub mod query;
pub mod task_service;
