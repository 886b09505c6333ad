pub mod board;
pub mod color;
pub mod encode;
pub mod errors;
pub mod game;
pub mod history;
pub mod r#move;
pub mod outcome;
pub mod pieces;
pub mod square;

#[cfg(feature = "serde")]
pub mod serde_support;
