pub mod board;
pub mod user;

pub use board::{Board, BoardInput};
pub use user::{normalize_email, PublicUser, User};
