//! Chat data model and the in-memory session store

pub mod message;
pub mod session;
pub mod store;

pub use message::{parse_timestamp, Message, Role};
pub use session::{SessionContextConfig, SessionContextUpdate};
pub use store::{ChatStore, InMemoryChatStore};
