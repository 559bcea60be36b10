//! Companion avatars shown in the popup. Only the id is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Avatar {
    #[default]
    Falcon,
    Capybara,
    RedPanda,
}

impl Avatar {
    pub const ALL: [Avatar; 3] = [Avatar::Falcon, Avatar::Capybara, Avatar::RedPanda];

    /// Stored identifier (`"falcon"`, `"capybara"`, `"redPanda"`).
    pub fn id(self) -> &'static str {
        match self {
            Avatar::Falcon => "falcon",
            Avatar::Capybara => "capybara",
            Avatar::RedPanda => "redPanda",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Avatar::Falcon => "Falcon",
            Avatar::Capybara => "Capybara",
            Avatar::RedPanda => "Red Panda",
        }
    }

    pub fn personality(self) -> &'static str {
        match self {
            Avatar::Falcon => "The Charismatic Leader",
            Avatar::Capybara => "The Zen Master",
            Avatar::RedPanda => "The Playful Perfectionist",
        }
    }

    pub fn image(self) -> String {
        format!("/icons/avatar-{}.png", self.label().to_lowercase().replace(' ', "-"))
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }
}

impl std::fmt::Display for Avatar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
