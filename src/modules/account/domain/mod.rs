pub mod session;

pub use session::{AuthSession, UserProfile};
