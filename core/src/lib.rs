pub mod board;
pub mod game_state;
pub mod perft;
pub mod types;

pub use board::*;
pub use game_state::*;
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use types::*;
