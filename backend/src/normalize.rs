//! Input normalization: raw form or JSON fields in, a storage-ready
//! `Animal` out. Only fields with meaningful content survive — a field is
//! meaningful when its value, coerced to text and trimmed, is non-empty.

use shared::{parse_traits, Animal, Distance};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("Pet name is required")]
    MissingName,
    #[error("Invalid JSON payload")]
    InvalidPayload,
}

/// External JSON field names and the storage names they map to. Applied
/// before emptiness filtering; external names outside this list (other
/// than `name`, `distance`, and `traits`) are ignored.
const JSON_FIELDS: [(&str, &str); 11] = [
    ("species", "species"),
    ("breed", "breed"),
    ("age", "age"),
    ("gender", "sex"),
    ("size", "size"),
    ("color", "color"),
    ("photo_url", "photo_url"),
    ("description", "bio"),
    ("shelter", "shelter"),
    ("requirements", "requirements"),
    ("address", "address"),
];

fn meaningful(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Coerce a JSON scalar to meaningful text. Strings are trimmed, numbers
/// and booleans are rendered; null, arrays, and objects carry no content.
fn text_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => meaningful(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalize a submitted form body into an animal record.
pub fn from_form(fields: &HashMap<String, String>) -> Result<Animal, NormalizeError> {
    let name = fields
        .get("name")
        .and_then(|raw| meaningful(raw))
        .ok_or(NormalizeError::MissingName)?;

    let mut animal = Animal::named(name);

    for field in Animal::TEXT_FIELDS {
        if let Some(value) = fields.get(field).and_then(|raw| meaningful(raw)) {
            animal.set_text_field(field, value);
        }
    }

    if let Some(raw) = fields.get("distance").and_then(|raw| meaningful(raw)) {
        animal.distance = Some(Distance::parse(&raw));
    }

    if let Some(raw) = fields.get("traits").and_then(|raw| meaningful(raw)) {
        animal.traits = parse_traits(&raw);
    }

    Ok(animal)
}

/// Normalize a JSON payload into an animal record, renaming external field
/// names to their storage names first.
pub fn from_json(payload: &serde_json::Value) -> Result<Animal, NormalizeError> {
    let object = payload.as_object().ok_or(NormalizeError::InvalidPayload)?;

    let name = object
        .get("name")
        .and_then(text_value)
        .ok_or(NormalizeError::MissingName)?;

    let mut animal = Animal::named(name);

    for (external, internal) in JSON_FIELDS {
        if let Some(value) = object.get(external).and_then(text_value) {
            animal.set_text_field(internal, value);
        }
    }

    if let Some(raw) = object.get("distance").and_then(text_value) {
        animal.distance = Some(Distance::parse(&raw));
    }

    if let Some(raw) = object.get("traits").and_then(text_value) {
        animal.traits = parse_traits(&raw);
    }

    Ok(animal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_form_missing_name_is_rejected() {
        assert_eq!(form_err(&[]), NormalizeError::MissingName);
        assert_eq!(form_err(&[("name", "   ")]), NormalizeError::MissingName);
        assert_eq!(
            form_err(&[("breed", "collie")]),
            NormalizeError::MissingName
        );
    }

    fn form_err(pairs: &[(&str, &str)]) -> NormalizeError {
        from_form(&form(pairs)).expect_err("normalization should fail")
    }

    #[test]
    fn test_form_trims_and_drops_empty_fields() {
        let animal = from_form(&form(&[
            ("name", "  Rex  "),
            ("breed", " collie "),
            ("age", "   "),
            ("bio", ""),
        ]))
        .unwrap();

        assert_eq!(animal.name, "Rex");
        assert_eq!(animal.breed.as_deref(), Some("collie"));
        assert!(animal.age.is_none(), "whitespace-only fields are dropped");
        assert!(animal.bio.is_none(), "empty fields are dropped");
    }

    #[test]
    fn test_form_distance_coercion() {
        let numeric = from_form(&form(&[("name", "Rex"), ("distance", "3.5")])).unwrap();
        assert_eq!(numeric.distance, Some(Distance::Miles(3.5)));

        let text = from_form(&form(&[("name", "Rex"), ("distance", "far away")])).unwrap();
        assert_eq!(text.distance, Some(Distance::Text("far away".to_string())));

        let absent = from_form(&form(&[("name", "Rex"), ("distance", "  ")])).unwrap();
        assert!(absent.distance.is_none());
    }

    #[test]
    fn test_form_trait_parsing() {
        let animal = from_form(&form(&[("name", "Rex"), ("traits", "friendly, , calm,")])).unwrap();
        assert_eq!(
            animal.traits,
            Some(vec!["friendly".to_string(), "calm".to_string()])
        );

        let empty = from_form(&form(&[("name", "Rex"), ("traits", ",")])).unwrap();
        assert!(empty.traits.is_none(), "empty trait lists are omitted");
    }

    #[test]
    fn test_json_renames_external_fields() {
        let animal = from_json(&json!({
            "name": "Rex",
            "gender": "male",
            "description": "A very good boy",
        }))
        .unwrap();

        assert_eq!(animal.sex.as_deref(), Some("male"));
        assert_eq!(animal.bio.as_deref(), Some("A very good boy"));
    }

    #[test]
    fn test_json_internal_names_of_renamed_fields_are_not_accepted() {
        // The external surface only knows "gender" and "description"
        let animal = from_json(&json!({
            "name": "Rex",
            "sex": "male",
            "bio": "A very good boy",
        }))
        .unwrap();

        assert!(animal.sex.is_none());
        assert!(animal.bio.is_none());
    }

    #[test]
    fn test_json_coerces_scalars_to_text() {
        let animal = from_json(&json!({
            "name": "Rex",
            "age": 3,
            "distance": 2.5,
        }))
        .unwrap();

        assert_eq!(animal.age.as_deref(), Some("3"));
        assert_eq!(animal.distance, Some(Distance::Miles(2.5)));
    }

    #[test]
    fn test_json_null_and_structured_values_are_absent() {
        let animal = from_json(&json!({
            "name": "Rex",
            "breed": null,
            "shelter": ["not", "text"],
        }))
        .unwrap();

        assert!(animal.breed.is_none());
        assert!(animal.shelter.is_none());
    }

    #[test]
    fn test_json_non_object_payload_is_invalid() {
        assert_eq!(
            from_json(&json!(["not", "an", "object"])).unwrap_err(),
            NormalizeError::InvalidPayload
        );
        assert_eq!(
            from_json(&json!("just a string")).unwrap_err(),
            NormalizeError::InvalidPayload
        );
    }

    #[test]
    fn test_json_missing_name_is_rejected() {
        assert_eq!(
            from_json(&json!({"breed": "collie"})).unwrap_err(),
            NormalizeError::MissingName
        );
        assert_eq!(
            from_json(&json!({"name": "  "})).unwrap_err(),
            NormalizeError::MissingName
        );
    }
}
