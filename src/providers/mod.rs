// Providers layer - gateways to external collaborators
pub mod mailer;
pub mod object_storage;

pub use mailer::{send_best_effort, LogMailer, Mailer};
pub use object_storage::{LocalDiskStorage, ObjectStorage, StoredImage};
