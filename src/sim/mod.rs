pub mod attempt;
pub mod event;
