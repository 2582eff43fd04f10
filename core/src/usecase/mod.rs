pub mod calendar;
pub mod habits;
pub mod progress;
pub mod report;

#[cfg(test)]
mod progress_test;
