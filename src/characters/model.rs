use crate::auth::AccountId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub type CharacterId = i64;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown character class: {0}")]
pub struct UnknownClass(pub i32);

/// Character class, serialized as its integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CharacterClass {
    #[default]
    Knight,
    Mage,
    Cleric,
}

impl From<CharacterClass> for i32 {
    fn from(class: CharacterClass) -> Self {
        match class {
            CharacterClass::Knight => 1,
            CharacterClass::Mage => 2,
            CharacterClass::Cleric => 3,
        }
    }
}

impl TryFrom<i32> for CharacterClass {
    type Error = UnknownClass;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Knight),
            2 => Ok(Self::Mage),
            3 => Ok(Self::Cleric),
            other => Err(UnknownClass(other)),
        }
    }
}

/// A stored character. `owner_id` is set at creation and never sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    #[serde(skip)]
    pub owner_id: AccountId,
    pub name: String,
    pub hit_points: i32,
    pub strength: i32,
    pub defense: i32,
    pub intelligence: i32,
    /// 1 = Knight, 2 = Mage, 3 = Cleric.
    #[schema(value_type = i32, example = 1)]
    pub class: CharacterClass,
}

/// Client-supplied attributes for a new or updated character. Missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterDraft {
    #[schema(example = "Frodo")]
    pub name: String,
    #[schema(example = 100)]
    pub hit_points: i32,
    #[schema(example = 10)]
    pub strength: i32,
    #[schema(example = 10)]
    pub defense: i32,
    #[schema(example = 10)]
    pub intelligence: i32,
    /// 1 = Knight, 2 = Mage, 3 = Cleric.
    #[schema(value_type = i32, example = 1)]
    pub class: CharacterClass,
}

impl Default for CharacterDraft {
    fn default() -> Self {
        Self {
            name: "Frodo".to_string(),
            hit_points: 100,
            strength: 10,
            defense: 10,
            intelligence: 10,
            class: CharacterClass::Knight,
        }
    }
}

impl CharacterDraft {
    #[must_use]
    pub fn into_character(self, id: CharacterId, owner_id: AccountId) -> Character {
        Character {
            id,
            owner_id,
            name: self.name,
            hit_points: self.hit_points,
            strength: self.strength,
            defense: self.defense,
            intelligence: self.intelligence,
            class: self.class,
        }
    }
}
