pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod traits;

// Re-exports for easy external access
pub use application::AccountService;
pub use domain::{AuthSession, UserProfile};
pub use infrastructure::IdentityClient;
pub use traits::IdentityProvider;
