pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::HealthbotConfig;
pub use error::{HealthbotError, Result};
pub use session::ConversationSession;
pub use types::*;
