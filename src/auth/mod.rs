pub mod session;

pub use session::SessionData;
