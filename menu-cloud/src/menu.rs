//! Menu mutation engine
//!
//! Pure transformations over a menu's section list. Every operation takes the
//! current sections and returns the complete replacement; nothing here touches
//! storage. Section and item order is insertion order and is preserved by
//! every operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Item, ItemImage, ItemPatch, NewItem, Section};
use shared::util::new_id;
use thiserror::Error;

/// Rejected mutation; the input sections are never partially modified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("{0} name is required")]
    EmptyName(&'static str),
    #[error("section {0} does not exist")]
    SectionNotFound(String),
    #[error("price must not be negative")]
    NegativePrice,
}

impl From<MenuError> for AppError {
    fn from(e: MenuError) -> Self {
        let message = e.to_string();
        match e {
            MenuError::EmptyName(what) => {
                AppError::with_message(ErrorCode::ValidationFailed, message).with_detail("field", what)
            }
            MenuError::SectionNotFound(section_id) => {
                AppError::with_message(ErrorCode::ValidationFailed, message)
                    .with_detail("section_id", section_id)
            }
            MenuError::NegativePrice => AppError::new(ErrorCode::InvalidPrice),
        }
    }
}

fn required_name(name: &str, what: &'static str) -> Result<String, MenuError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MenuError::EmptyName(what));
    }
    Ok(name.to_string())
}

fn checked_price(price: Decimal) -> Result<Decimal, MenuError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(MenuError::NegativePrice);
    }
    Ok(price)
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn normalize_image(image: Option<&ItemImage>) -> Option<ItemImage> {
    image.and_then(|img| {
        trimmed(Some(&img.url)).map(|url| ItemImage {
            url,
            source: img.source,
        })
    })
}

/// Append a new, empty section
pub fn add_section(sections: &[Section], name: &str) -> Result<Vec<Section>, MenuError> {
    let name = required_name(name, "section")?;
    let mut next = sections.to_vec();
    next.push(Section {
        id: new_id(),
        name,
        items: Vec::new(),
    });
    Ok(next)
}

/// Rename a section; unknown ids leave the sections unchanged
pub fn rename_section(
    sections: &[Section],
    section_id: &str,
    name: &str,
) -> Result<Vec<Section>, MenuError> {
    let name = required_name(name, "section")?;
    let mut next = sections.to_vec();
    if let Some(section) = next.iter_mut().find(|s| s.id == section_id) {
        section.name = name;
    }
    Ok(next)
}

/// Remove a section and its items; idempotent
pub fn delete_section(sections: &[Section], section_id: &str) -> Vec<Section> {
    sections
        .iter()
        .filter(|s| s.id != section_id)
        .cloned()
        .collect()
}

/// Append a new item to an existing section
///
/// Price defaults to zero; a negative price is rejected rather than clamped.
pub fn add_item(
    sections: &[Section],
    section_id: &str,
    fields: &NewItem,
) -> Result<Vec<Section>, MenuError> {
    let name = required_name(&fields.name, "item")?;
    let price = checked_price(fields.price.unwrap_or(Decimal::ZERO))?;

    let mut next = sections.to_vec();
    let section = next
        .iter_mut()
        .find(|s| s.id == section_id)
        .ok_or_else(|| MenuError::SectionNotFound(section_id.to_string()))?;

    let mut item = Item {
        id: new_id(),
        name,
        price,
        description: trimmed(fields.description.as_deref()),
        image_url: None,
        image_type: None,
    };
    item.set_image(normalize_image(fields.image.as_ref()));
    section.items.push(item);

    Ok(next)
}

/// Patch the first item with this id across all sections
///
/// The patch is validated even when the item does not exist; an unknown id
/// then leaves the sections unchanged.
pub fn edit_item(
    sections: &[Section],
    item_id: &str,
    patch: &ItemPatch,
) -> Result<Vec<Section>, MenuError> {
    let name = patch
        .name
        .as_deref()
        .map(|n| required_name(n, "item"))
        .transpose()?;
    let price = patch.price.map(checked_price).transpose()?;

    let mut next = sections.to_vec();
    let Some(item) = next
        .iter_mut()
        .flat_map(|s| s.items.iter_mut())
        .find(|i| i.id == item_id)
    else {
        return Ok(next);
    };

    if let Some(name) = name {
        item.name = name;
    }
    if let Some(price) = price {
        item.price = price;
    }
    if let Some(description) = &patch.description {
        item.description = trimmed(description.as_deref());
    }
    if let Some(image) = &patch.image {
        item.set_image(normalize_image(image.as_ref()));
    }

    Ok(next)
}

/// Remove an item from a section; idempotent
pub fn delete_item(sections: &[Section], section_id: &str, item_id: &str) -> Vec<Section> {
    let mut next = sections.to_vec();
    if let Some(section) = next.iter_mut().find(|s| s.id == section_id) {
        section.items.retain(|i| i.id != item_id);
    }
    next
}

/// A single dashboard edit, as sent over the wire
///
/// ```json
/// {"type": "addItem", "sectionId": "…", "item": {"name": "Fries", "price": 4.5}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MenuCommand {
    AddSection {
        name: String,
    },
    RenameSection {
        section_id: String,
        name: String,
    },
    DeleteSection {
        section_id: String,
    },
    AddItem {
        section_id: String,
        item: NewItem,
    },
    EditItem {
        item_id: String,
        patch: ItemPatch,
    },
    DeleteItem {
        section_id: String,
        item_id: String,
    },
}

impl MenuCommand {
    /// Run the command against a section list
    pub fn apply(&self, sections: &[Section]) -> Result<Vec<Section>, MenuError> {
        match self {
            MenuCommand::AddSection { name } => add_section(sections, name),
            MenuCommand::RenameSection { section_id, name } => {
                rename_section(sections, section_id, name)
            }
            MenuCommand::DeleteSection { section_id } => Ok(delete_section(sections, section_id)),
            MenuCommand::AddItem { section_id, item } => add_item(sections, section_id, item),
            MenuCommand::EditItem { item_id, patch } => edit_item(sections, item_id, patch),
            MenuCommand::DeleteItem {
                section_id,
                item_id,
            } => Ok(delete_item(sections, section_id, item_id)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MenuCommand::AddSection { .. } => "addSection",
            MenuCommand::RenameSection { .. } => "renameSection",
            MenuCommand::DeleteSection { .. } => "deleteSection",
            MenuCommand::AddItem { .. } => "addItem",
            MenuCommand::EditItem { .. } => "editItem",
            MenuCommand::DeleteItem { .. } => "deleteItem",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ImageType;

    fn fries() -> NewItem {
        NewItem {
            name: "Fries".into(),
            price: Some(Decimal::new(45, 1)),
            description: None,
            image: None,
        }
    }

    fn menu_with_section() -> Vec<Section> {
        add_section(&[], "Appetizers").unwrap()
    }

    #[test]
    fn test_add_section_appends_trimmed() {
        let sections = add_section(&[], "  Appetizers ").unwrap();
        let sections = add_section(&sections, "Mains").unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Appetizers");
        assert_eq!(sections[1].name, "Mains");
        assert!(sections[0].items.is_empty());
        assert_ne!(sections[0].id, sections[1].id);
    }

    #[test]
    fn test_add_section_rejects_blank_name() {
        assert_eq!(add_section(&[], "   "), Err(MenuError::EmptyName("section")));
    }

    #[test]
    fn test_add_then_delete_section_restores() {
        let original = add_section(&menu_with_section(), "Mains").unwrap();
        let added = add_section(&original, "Desserts").unwrap();
        let new_id = added.last().unwrap().id.clone();
        assert_eq!(delete_section(&added, &new_id), original);
    }

    #[test]
    fn test_rename_section() {
        let sections = menu_with_section();
        let id = sections[0].id.clone();
        let renamed = rename_section(&sections, &id, "Starters").unwrap();
        assert_eq!(renamed[0].name, "Starters");
        assert_eq!(renamed[0].id, id);

        assert_eq!(rename_section(&sections, "missing", "X").unwrap(), sections);
        assert!(rename_section(&sections, &id, "").is_err());
    }

    #[test]
    fn test_delete_missing_section_is_noop() {
        let sections = menu_with_section();
        assert_eq!(delete_section(&sections, "missing"), sections);
    }

    #[test]
    fn test_add_item_and_delete_restores_section() {
        let sections = menu_with_section();
        let section_id = sections[0].id.clone();

        let added = add_item(&sections, &section_id, &fries()).unwrap();
        let item = &added[0].items[0];
        assert_eq!(item.name, "Fries");
        assert_eq!(item.price, Decimal::new(45, 1));

        let removed = delete_item(&added, &section_id, &item.id);
        assert_eq!(removed[0].items, sections[0].items);
    }

    #[test]
    fn test_add_item_defaults_and_validation() {
        let sections = menu_with_section();
        let section_id = sections[0].id.clone();

        let free = NewItem {
            name: "Water".into(),
            price: None,
            description: Some("  ".into()),
            image: None,
        };
        let added = add_item(&sections, &section_id, &free).unwrap();
        assert_eq!(added[0].items[0].price, Decimal::ZERO);
        assert_eq!(added[0].items[0].description, None);

        let negative = NewItem {
            price: Some(Decimal::new(-1, 0)),
            ..fries()
        };
        assert_eq!(
            add_item(&sections, &section_id, &negative),
            Err(MenuError::NegativePrice)
        );

        let nameless = NewItem {
            name: " ".into(),
            ..fries()
        };
        assert_eq!(
            add_item(&sections, &section_id, &nameless),
            Err(MenuError::EmptyName("item"))
        );

        assert_eq!(
            add_item(&sections, "missing", &fries()),
            Err(MenuError::SectionNotFound("missing".into()))
        );
    }

    #[test]
    fn test_add_item_with_image() {
        let sections = menu_with_section();
        let section_id = sections[0].id.clone();
        let with_image = NewItem {
            image: Some(ItemImage {
                url: "https://img.example.com/fries.jpg".into(),
                source: ImageType::Url,
            }),
            ..fries()
        };
        let added = add_item(&sections, &section_id, &with_image).unwrap();
        let item = &added[0].items[0];
        assert_eq!(item.image_type, Some(ImageType::Url));
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://img.example.com/fries.jpg")
        );
    }

    #[test]
    fn test_edit_item_patches_fields() {
        let sections = menu_with_section();
        let section_id = sections[0].id.clone();
        let sections = add_item(&sections, &section_id, &fries()).unwrap();
        let item_id = sections[0].items[0].id.clone();

        let patch = ItemPatch {
            name: Some("Curly Fries".into()),
            price: Some(Decimal::new(5, 0)),
            description: Some(Some("Seasoned".into())),
            image: None,
        };
        let edited = edit_item(&sections, &item_id, &patch).unwrap();
        let item = &edited[0].items[0];
        assert_eq!(item.name, "Curly Fries");
        assert_eq!(item.price, Decimal::new(5, 0));
        assert_eq!(item.description.as_deref(), Some("Seasoned"));
        assert_eq!(item.id, item_id);

        let clear = ItemPatch {
            description: Some(None),
            ..Default::default()
        };
        let cleared = edit_item(&edited, &item_id, &clear).unwrap();
        assert_eq!(cleared[0].items[0].description, None);
        assert_eq!(cleared[0].items[0].name, "Curly Fries");
    }

    #[test]
    fn test_edit_missing_item_is_noop() {
        let sections = menu_with_section();
        let patch = ItemPatch {
            name: Some("Ghost".into()),
            ..Default::default()
        };
        assert_eq!(edit_item(&sections, "missing", &patch).unwrap(), sections);
    }

    #[test]
    fn test_edit_item_rejects_negative_price() {
        let sections = menu_with_section();
        let patch = ItemPatch {
            price: Some(Decimal::new(-250, 2)),
            ..Default::default()
        };
        assert_eq!(
            edit_item(&sections, "any", &patch),
            Err(MenuError::NegativePrice)
        );
    }

    #[test]
    fn test_edit_item_first_match_wins() {
        let mut sections = add_section(&menu_with_section(), "Mains").unwrap();
        let duplicate = Item {
            id: "dup".into(),
            name: "Soup".into(),
            price: Decimal::ONE,
            description: None,
            image_url: None,
            image_type: None,
        };
        sections[0].items.push(duplicate.clone());
        sections[1].items.push(duplicate);

        let patch = ItemPatch {
            name: Some("Stew".into()),
            ..Default::default()
        };
        let edited = edit_item(&sections, "dup", &patch).unwrap();
        assert_eq!(edited[0].items[0].name, "Stew");
        assert_eq!(edited[1].items[0].name, "Soup");
    }

    #[test]
    fn test_command_wire_format() {
        let cmd: MenuCommand = serde_json::from_str(
            r#"{"type":"addItem","sectionId":"s1","item":{"name":"Fries","price":4.5}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            MenuCommand::AddItem {
                section_id: "s1".into(),
                item: fries(),
            }
        );
        assert_eq!(cmd.kind(), "addItem");

        let cmd: MenuCommand =
            serde_json::from_str(r#"{"type":"deleteSection","sectionId":"s1"}"#).unwrap();
        assert_eq!(cmd.apply(&[]).unwrap(), Vec::<Section>::new());
    }

    #[test]
    fn test_menu_error_maps_to_validation() {
        let err: AppError = MenuError::SectionNotFound("s9".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap().get("section_id").unwrap(), "s9");

        let err: AppError = MenuError::NegativePrice.into();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
    }
}
