//! # Avatar Customization
//!
//! Seven independent appearance fields, each limited to a small fixed set of
//! values. There are no cross-field rules, so the randomizer samples every
//! field on its own.
//!
//! The record holds no durable state. Saving goes through a callback the
//! caller supplies (the TUI writes `~/.twin/avatar.json`).

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an appearance enum with its legal values, labels and parsing.
macro_rules! appearance {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn parse(value: &str) -> Option<Self> {
                let wanted = value.trim().to_lowercase();
                Self::ALL.iter().copied().find(|v| v.label() == wanted)
            }

            fn step(self, forward: bool) -> Self {
                let all = Self::ALL;
                let idx = all.iter().position(|v| *v == self).unwrap_or(0);
                let next = if forward {
                    (idx + 1) % all.len()
                } else {
                    (idx + all.len() - 1) % all.len()
                };
                all[next]
            }

            fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
                *Self::ALL.choose(rng).unwrap_or(&Self::ALL[0])
            }
        }
    };
}

appearance!(SkinTone {
    Light => "light",
    Fair => "fair",
    Medium => "medium",
    Olive => "olive",
    Tan => "tan",
    Brown => "brown",
    Dark => "dark",
});

appearance!(HairStyle {
    Short => "short",
    Long => "long",
    Curly => "curly",
    Wavy => "wavy",
    Ponytail => "ponytail",
    Bald => "bald",
});

appearance!(HairColor {
    Black => "black",
    Brown => "brown",
    Blonde => "blonde",
    Red => "red",
    Gray => "gray",
    Blue => "blue",
});

appearance!(FaceShape {
    Oval => "oval",
    Round => "round",
    Square => "square",
    Heart => "heart",
    Long => "long",
});

appearance!(EyeColor {
    Brown => "brown",
    Blue => "blue",
    Green => "green",
    Hazel => "hazel",
    Gray => "gray",
});

appearance!(Outfit {
    Casual => "casual",
    Formal => "formal",
    Sporty => "sporty",
    Business => "business",
    Creative => "creative",
});

appearance!(Accessory {
    None => "none",
    Glasses => "glasses",
    Hat => "hat",
    Earrings => "earrings",
    Headphones => "headphones",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarField {
    SkinTone,
    HairStyle,
    HairColor,
    FaceShape,
    EyeColor,
    Outfit,
    Accessory,
}

impl AvatarField {
    pub const ALL: [AvatarField; 7] = [
        AvatarField::SkinTone,
        AvatarField::HairStyle,
        AvatarField::HairColor,
        AvatarField::FaceShape,
        AvatarField::EyeColor,
        AvatarField::Outfit,
        AvatarField::Accessory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AvatarField::SkinTone => "Skin tone",
            AvatarField::HairStyle => "Hair style",
            AvatarField::HairColor => "Hair color",
            AvatarField::FaceShape => "Face shape",
            AvatarField::EyeColor => "Eye color",
            AvatarField::Outfit => "Outfit",
            AvatarField::Accessory => "Accessory",
        }
    }

    /// Accepts `hair_color`, `hair-color`, `haircolor` or `Hair color`.
    pub fn from_key(key: &str) -> Option<AvatarField> {
        let normalize = |s: &str| {
            s.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        };
        let wanted = normalize(key);
        Self::ALL.into_iter().find(|f| normalize(f.label()) == wanted)
    }

    /// Next field in display order (wraps).
    pub fn next(self) -> AvatarField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous field in display order (wraps).
    pub fn prev(self) -> AvatarField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Legal values for this field, as labels.
    pub fn options(self) -> Vec<&'static str> {
        match self {
            AvatarField::SkinTone => SkinTone::ALL.iter().map(|v| v.label()).collect(),
            AvatarField::HairStyle => HairStyle::ALL.iter().map(|v| v.label()).collect(),
            AvatarField::HairColor => HairColor::ALL.iter().map(|v| v.label()).collect(),
            AvatarField::FaceShape => FaceShape::ALL.iter().map(|v| v.label()).collect(),
            AvatarField::EyeColor => EyeColor::ALL.iter().map(|v| v.label()).collect(),
            AvatarField::Outfit => Outfit::ALL.iter().map(|v| v.label()).collect(),
            AvatarField::Accessory => Accessory::ALL.iter().map(|v| v.label()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarError {
    pub field: AvatarField,
    pub value: String,
}

impl fmt::Display for AvatarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a valid {} (expected one of: {})",
            self.value,
            self.field.label().to_lowercase(),
            self.field.options().join(", ")
        )
    }
}

impl std::error::Error for AvatarError {}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarConfig {
    pub skin_tone: SkinTone,
    pub hair_style: HairStyle,
    pub hair_color: HairColor,
    pub face_shape: FaceShape,
    pub eye_color: EyeColor,
    pub outfit: Outfit,
    pub accessory: Accessory,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            skin_tone: SkinTone::Medium,
            hair_style: HairStyle::Short,
            hair_color: HairColor::Brown,
            face_shape: FaceShape::Oval,
            eye_color: EyeColor::Brown,
            outfit: Outfit::Casual,
            accessory: Accessory::None,
        }
    }
}

impl AvatarConfig {
    /// Current value of `field` as its label.
    pub fn get(&self, field: AvatarField) -> &'static str {
        match field {
            AvatarField::SkinTone => self.skin_tone.label(),
            AvatarField::HairStyle => self.hair_style.label(),
            AvatarField::HairColor => self.hair_color.label(),
            AvatarField::FaceShape => self.face_shape.label(),
            AvatarField::EyeColor => self.eye_color.label(),
            AvatarField::Outfit => self.outfit.label(),
            AvatarField::Accessory => self.accessory.label(),
        }
    }

    /// Sets `field` from a label. Unknown labels leave the record unchanged.
    pub fn set(&mut self, field: AvatarField, value: &str) -> Result<(), AvatarError> {
        let invalid = || AvatarError {
            field,
            value: value.to_string(),
        };
        match field {
            AvatarField::SkinTone => self.skin_tone = SkinTone::parse(value).ok_or_else(invalid)?,
            AvatarField::HairStyle => self.hair_style = HairStyle::parse(value).ok_or_else(invalid)?,
            AvatarField::HairColor => self.hair_color = HairColor::parse(value).ok_or_else(invalid)?,
            AvatarField::FaceShape => self.face_shape = FaceShape::parse(value).ok_or_else(invalid)?,
            AvatarField::EyeColor => self.eye_color = EyeColor::parse(value).ok_or_else(invalid)?,
            AvatarField::Outfit => self.outfit = Outfit::parse(value).ok_or_else(invalid)?,
            AvatarField::Accessory => self.accessory = Accessory::parse(value).ok_or_else(invalid)?,
        }
        Ok(())
    }

    /// Moves `field` to its next (or previous) legal value, wrapping around.
    pub fn cycle(&mut self, field: AvatarField, forward: bool) {
        match field {
            AvatarField::SkinTone => self.skin_tone = self.skin_tone.step(forward),
            AvatarField::HairStyle => self.hair_style = self.hair_style.step(forward),
            AvatarField::HairColor => self.hair_color = self.hair_color.step(forward),
            AvatarField::FaceShape => self.face_shape = self.face_shape.step(forward),
            AvatarField::EyeColor => self.eye_color = self.eye_color.step(forward),
            AvatarField::Outfit => self.outfit = self.outfit.step(forward),
            AvatarField::Accessory => self.accessory = self.accessory.step(forward),
        }
    }

    /// Samples every field uniformly and independently.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            skin_tone: SkinTone::random(rng),
            hair_style: HairStyle::random(rng),
            hair_color: HairColor::random(rng),
            face_shape: FaceShape::random(rng),
            eye_color: EyeColor::random(rng),
            outfit: Outfit::random(rng),
            accessory: Accessory::random(rng),
        }
    }

    /// Hands the record to `save`. The callback decides where it goes.
    pub fn save<F, E>(&self, save: F) -> Result<(), E>
    where
        F: FnOnce(&AvatarConfig) -> Result<(), E>,
    {
        save(self)
    }

    /// One-line summary, e.g. "medium skin, short brown hair, ...".
    pub fn describe(&self) -> String {
        let accessory = match self.accessory {
            Accessory::None => String::new(),
            other => format!(", {}", other.label()),
        };
        format!(
            "{} skin, {} {} hair, {} face, {} eyes, {} outfit{}",
            self.skin_tone.label(),
            self.hair_style.label(),
            self.hair_color.label(),
            self.face_shape.label(),
            self.eye_color.label(),
            self.outfit.label(),
            accessory
        )
    }
}
