pub mod grid;
pub mod score;
