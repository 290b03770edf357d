use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(ConnectionId);
id_newtype!(RoomId);

/// Card color as it appears on the wire. `Back` never crosses the wire from
/// the authority; it is the client-side placeholder for a face-down card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardColor {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
    #[serde(rename = "back")]
    Back,
}

impl CardColor {
    /// The four colors a wild card can be resolved to.
    pub fn is_solid(self) -> bool {
        matches!(self, Self::Red | Self::Yellow | Self::Green | Self::Blue)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Wild => "Wild",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single card. The value is an opaque string to the client ("0"–"9",
/// "Skip", "Reverse", "Draw Two", "Wild", "Wild Draw Four"); equality is by
/// `(color, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: CardColor,
    pub value: String,
}

impl Card {
    pub fn new(color: CardColor, value: impl Into<String>) -> Self {
        Self {
            color,
            value: value.into(),
        }
    }

    /// Placeholder rendered for an opponent's hidden card. Carries no game
    /// information.
    pub fn face_down() -> Self {
        Self {
            color: CardColor::Back,
            value: String::new(),
        }
    }

    pub fn is_wild(&self) -> bool {
        self.color == CardColor::Wild
    }

    /// Follow rule against the discard top: wild, color match, or value
    /// match.
    pub fn can_follow(&self, top: &Card) -> bool {
        self.is_wild() || self.color == top.color || self.value == top.value
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.color)
        } else {
            write!(f, "{} {}", self.color, self.value)
        }
    }
}
