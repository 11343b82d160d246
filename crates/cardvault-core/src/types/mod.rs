//! Core domain types.
//!
//! These types enforce their invariants at construction time, so a value
//! that exists is a value that can be sent to the card API or persisted.

mod color;
mod condition;
mod rarity;
mod scryfall_id;
mod set_code;
mod user_id;

pub use color::{Color, ColorSet};
pub use condition::Condition;
pub use rarity::Rarity;
pub use scryfall_id::ScryfallId;
pub use set_code::SetCode;
pub use user_id::UserId;
