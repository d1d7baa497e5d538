//! Runtime: the session that ties the universe to its console and storage

pub mod session;

pub use session::Session;
