pub mod achievement;
pub mod profile;
pub mod task;
