pub mod document;
pub mod user;

pub use document::*;
pub use user::*;
