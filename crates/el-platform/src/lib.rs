pub mod app_dirs;
pub mod native_messaging;

pub use app_dirs::DirsAppDirsAdapter;
pub use native_messaging::NativeMessagingBridge;
