pub mod file;
pub mod json_file;
pub mod profile;
pub mod session;
pub mod traits;
pub mod watch;

// Re-export
pub use file::FileTaskRepository;
pub use profile::FileProfileRepository;
pub use session::FileSessionProvider;
pub use traits::{AuthProvider, ProfileRepository, TaskRepository};
pub use watch::{Callback, Subscription, Watchers};
