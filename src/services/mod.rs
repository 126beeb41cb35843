pub mod auth;
pub mod board;

pub use auth::AuthService;
pub use board::BoardService;
