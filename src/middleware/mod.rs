pub mod cookies;
pub mod flash;
pub mod session;

pub use flash::{Flash, FlashKind};
pub use session::{AuthenticatedUser, SessionManager, SessionState};
