use crate::characters::{CharacterDraft, CharacterId};
use serde::Deserialize;
use std::fmt;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct Credentials {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "pw1")]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Body of `PUT /character`: the target id plus its new attributes.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCharacter {
    pub id: CharacterId,
    #[serde(flatten)]
    pub draft: CharacterDraft,
}
