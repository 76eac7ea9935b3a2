pub mod error;
pub mod health;
pub mod item;
pub mod recommendation;
pub mod tags;
