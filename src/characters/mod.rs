//! Owner-scoped character records.

mod model;
mod service;

pub use model::{Character, CharacterClass, CharacterDraft, CharacterId, UnknownClass};
pub use service::CharacterService;
