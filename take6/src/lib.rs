pub use board::*;
pub use cards::*;
pub use deck::*;
pub use errors::*;
pub use game::*;
pub use player::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod cards;
mod deck;
mod errors;
mod game;
mod player;
mod visualization;
