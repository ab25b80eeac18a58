mod file_session;

pub use file_session::{FileSessionIdentity, DEFAULT_SESSION_FILE};
