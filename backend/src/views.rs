//! Server-rendered HTML pages. Deliberately plain: every page is a small
//! string built from the records it shows, with all record content escaped.

use shared::{Animal, Distance};

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title} - Pet Shelter</title></head>\n\
         <body>\n<nav><a href=\"/\">Home</a> <a href=\"/add\">Add</a> \
         <a href=\"/delete\">Delete</a> <a href=\"/login\">Login</a> \
         <a href=\"/register\">Register</a> <a href=\"/logout\">Logout</a></nav>\n\
         <h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        body = body,
    )
}

fn distance_label(distance: &Distance) -> String {
    match distance {
        Distance::Miles(miles) => format!("{miles} miles"),
        Distance::Text(text) => escape(text),
    }
}

fn listing_item(animal: &Animal, controls: bool) -> String {
    let id = animal.id.as_deref().unwrap_or("");
    let mut item = format!(
        "<li><a href=\"/details/{id}\">{name}</a>",
        id = escape(id),
        name = escape(&animal.name),
    );
    if let Some(breed) = &animal.breed {
        item.push_str(&format!(" ({})", escape(breed)));
    }
    if controls {
        item.push_str(&format!(
            " <form method=\"post\" action=\"/delete/{id}\">\
             <button type=\"submit\">Delete</button></form>",
            id = escape(id),
        ));
    }
    item.push_str("</li>");
    item
}

pub fn home_page(animals: &[Animal]) -> String {
    let items: String = animals
        .iter()
        .map(|animal| listing_item(animal, false))
        .collect();
    page("Animals", &format!("<ul>{items}</ul>"))
}

pub fn delete_page(animals: &[Animal]) -> String {
    let items: String = animals
        .iter()
        .map(|animal| listing_item(animal, true))
        .collect();
    page("Delete an animal", &format!("<ul>{items}</ul>"))
}

pub fn details_page(animal: &Animal) -> String {
    let mut rows = String::new();
    for field in Animal::TEXT_FIELDS {
        if let Some(value) = animal.text_field(field) {
            rows.push_str(&format!(
                "<tr><th>{field}</th><td>{value}</td></tr>",
                value = escape(value),
            ));
        }
    }
    if let Some(distance) = &animal.distance {
        rows.push_str(&format!(
            "<tr><th>distance</th><td>{}</td></tr>",
            distance_label(distance),
        ));
    }
    if let Some(traits) = &animal.traits {
        let badges: Vec<String> = traits.iter().map(|t| escape(t)).collect();
        rows.push_str(&format!(
            "<tr><th>traits</th><td>{}</td></tr>",
            badges.join(", "),
        ));
    }

    let id = animal.id.as_deref().unwrap_or("");
    let body = format!(
        "<table>{rows}</table>\n<p><a href=\"/edit/{id}\">Edit</a></p>",
        id = escape(id),
    );
    page(&animal.name, &body)
}

fn animal_form(action: &str, animal: Option<&Animal>) -> String {
    let value_of = |field: &str| -> String {
        animal
            .and_then(|a| a.text_field(field))
            .map(escape)
            .unwrap_or_default()
    };

    let mut inputs = format!(
        "<label>name <input name=\"name\" value=\"{}\" required></label><br>",
        animal.map(|a| escape(&a.name)).unwrap_or_default(),
    );
    for field in Animal::TEXT_FIELDS {
        inputs.push_str(&format!(
            "<label>{field} <input name=\"{field}\" value=\"{value}\"></label><br>",
            value = value_of(field),
        ));
    }
    inputs.push_str(&format!(
        "<label>distance <input name=\"distance\" value=\"{}\"></label><br>",
        animal
            .and_then(|a| a.distance.as_ref())
            .map(|d| escape(&d.as_text()))
            .unwrap_or_default(),
    ));
    inputs.push_str(&format!(
        "<label>traits <input name=\"traits\" value=\"{}\" \
         placeholder=\"comma, separated\"></label><br>",
        animal
            .and_then(|a| a.traits_text())
            .map(|t| escape(&t))
            .unwrap_or_default(),
    ));

    format!(
        "<form method=\"post\" action=\"{action}\">{inputs}\
         <button type=\"submit\">Save</button></form>",
        action = escape(action),
    )
}

pub fn add_page() -> String {
    page("Add an animal", &animal_form("/add", None))
}

pub fn edit_page(animal: &Animal) -> String {
    let id = animal.id.as_deref().unwrap_or("");
    let action = format!("/update/{id}");
    page("Edit animal", &animal_form(&action, Some(animal)))
}

fn credentials_form(action: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>username <input name=\"username\" required></label><br>\
         <label>password <input name=\"password\" type=\"password\" required></label><br>\
         <button type=\"submit\">Submit</button></form>",
        action = escape(action),
    )
}

pub fn login_page() -> String {
    page("Login", &credentials_form("/login"))
}

pub fn register_page() -> String {
    page("Register", &credentials_form("/register"))
}

pub fn search_page() -> String {
    page("Search", "<p>Search is not available yet.</p>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_content_is_escaped() {
        let mut animal = Animal::named("<script>alert(1)</script>");
        animal.id = Some("abc".to_string());
        animal.bio = Some("likes \"hugs\" & naps".to_string());

        let html = details_page(&animal);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("likes &quot;hugs&quot; &amp; naps"));
    }

    #[test]
    fn test_home_page_lists_each_animal() {
        let mut rex = Animal::named("Rex");
        rex.id = Some("id-rex".to_string());
        let mut luna = Animal::named("Luna");
        luna.id = Some("id-luna".to_string());

        let html = home_page(&[rex, luna]);
        assert!(html.contains("/details/id-rex"));
        assert!(html.contains("Rex"));
        assert!(html.contains("/details/id-luna"));
        assert!(html.contains("Luna"));
    }

    #[test]
    fn test_delete_page_carries_delete_controls() {
        let mut rex = Animal::named("Rex");
        rex.id = Some("id-rex".to_string());

        let html = delete_page(&[rex]);
        assert!(html.contains("action=\"/delete/id-rex\""));
    }

    #[test]
    fn test_edit_page_prefills_stored_fields() {
        let mut animal = Animal::named("Luna");
        animal.id = Some("id-luna".to_string());
        animal.breed = Some("tabby".to_string());
        animal.distance = Some(Distance::Miles(3.5));
        animal.traits = Some(vec!["curious".to_string(), "calm".to_string()]);

        let html = edit_page(&animal);
        assert!(html.contains("action=\"/update/id-luna\""));
        assert!(html.contains("value=\"Luna\""));
        assert!(html.contains("value=\"tabby\""));
        assert!(html.contains("value=\"3.5\""));
        assert!(html.contains("value=\"curious, calm\""));
    }
}
