use serde::{Deserialize, Serialize};

/// Distance between a pet and the person browsing for one.
///
/// Shelters supply this as free text, so it is either a parsed number of
/// miles or whatever the shelter typed ("walking distance", "far away").
/// Consumers must handle both cases explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    /// The supplied text parsed cleanly as a number.
    Miles(f64),
    /// Non-numeric text, kept as entered (after trimming).
    Text(String),
}

impl Distance {
    /// Parse raw distance text: a clean numeric parse becomes `Miles`,
    /// anything else falls back to `Text`. This never fails.
    pub fn parse(raw: &str) -> Distance {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(miles) => Distance::Miles(miles),
            Err(_) => Distance::Text(trimmed.to_string()),
        }
    }

    /// Render for form pre-fill and display.
    pub fn as_text(&self) -> String {
        match self {
            Distance::Miles(miles) => miles.to_string(),
            Distance::Text(text) => text.clone(),
        }
    }
}

/// A shelter animal listing.
///
/// Only `name` is required. Every other attribute is present exactly when a
/// non-empty value was supplied — absence, not null, signals "unknown" — so
/// serialization skips `None` fields and stored documents stay sparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Animal {
    /// Store-assigned identifier; `None` until the record is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
    /// Comma-separated in input, stored as an ordered list; omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<String>>,
}

impl Animal {
    /// The optional free-text attributes, in display order.
    pub const TEXT_FIELDS: [&'static str; 11] = [
        "species",
        "breed",
        "age",
        "sex",
        "size",
        "color",
        "bio",
        "requirements",
        "shelter",
        "address",
        "photo_url",
    ];

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up an optional text attribute by field name.
    pub fn text_field(&self, field: &str) -> Option<&str> {
        let value = match field {
            "species" => &self.species,
            "breed" => &self.breed,
            "age" => &self.age,
            "sex" => &self.sex,
            "size" => &self.size,
            "color" => &self.color,
            "bio" => &self.bio,
            "requirements" => &self.requirements,
            "shelter" => &self.shelter,
            "address" => &self.address,
            "photo_url" => &self.photo_url,
            _ => &None,
        };
        value.as_deref()
    }

    /// Set an optional text attribute by field name. Unknown field names are
    /// ignored so callers can drive this from a field list.
    pub fn set_text_field(&mut self, field: &str, value: String) {
        let slot = match field {
            "species" => &mut self.species,
            "breed" => &mut self.breed,
            "age" => &mut self.age,
            "sex" => &mut self.sex,
            "size" => &mut self.size,
            "color" => &mut self.color,
            "bio" => &mut self.bio,
            "requirements" => &mut self.requirements,
            "shelter" => &mut self.shelter,
            "address" => &mut self.address,
            "photo_url" => &mut self.photo_url,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Traits joined back to the comma-separated form used by the edit page.
    pub fn traits_text(&self) -> Option<String> {
        self.traits.as_ref().map(|traits| traits.join(", "))
    }
}

/// Split a raw comma-separated trait string into non-empty trimmed pieces,
/// preserving order. Returns `None` when nothing meaningful remains, so the
/// field can be omitted instead of stored as an empty list.
pub fn parse_traits(raw: &str) -> Option<Vec<String>> {
    let traits: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect();
    if traits.is_empty() {
        None
    } else {
        Some(traits)
    }
}

/// Form body for both login and registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// JSON response for login, registration, logout, and gated failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            id: None,
        }
    }

    pub fn created(id: String) -> Self {
        Self {
            success: true,
            message: None,
            id: Some(id),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            id: None,
        }
    }
}

/// JSON response for a successful `/add_pet` submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPetResponse {
    pub id: String,
}

/// JSON error body for API failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
