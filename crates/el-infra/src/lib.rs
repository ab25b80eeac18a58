pub mod session;
pub mod supabase;
pub mod time;

pub use session::FileSessionIdentity;
pub use supabase::{SupabaseConfig, SupabaseProfileStore, SupabaseRestClient};
pub use time::SystemClock;
