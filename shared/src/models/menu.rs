//! Menu Model
//!
//! A menu is one aggregate per restaurant: ordered sections, each holding
//! ordered items. Writes replace the whole `sections` tree at once, guarded by
//! `version`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{bool_true, default_true, double_option, empty_as_none};

/// Version assigned to a freshly created menu
pub const INITIAL_MENU_VERSION: u64 = 1;

/// Menu entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Store-assigned id (not part of the stored document body)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub restaurant_id: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(flatten)]
    pub settings: DisplaySettings,
    /// Optimistic-concurrency token, bumped on every write
    #[serde(default = "initial_version")]
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

fn initial_version() -> u64 {
    INITIAL_MENU_VERSION
}

impl Menu {
    pub fn find_section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// First item with this id across all sections
    pub fn find_item(&self, item_id: &str) -> Option<&Item> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .find(|i| i.id == item_id)
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// Public page display flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub show_prices: bool,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub show_descriptions: bool,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub show_images: bool,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub allow_sharing: bool,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_footer: Option<String>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_prices: true,
            show_descriptions: true,
            show_images: true,
            allow_sharing: true,
            custom_footer: None,
        }
    }
}

/// Display settings patch
///
/// `custom_footer: Some(None)` clears the footer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettingsUpdate {
    pub show_prices: Option<bool>,
    pub show_descriptions: Option<bool>,
    pub show_images: Option<bool>,
    pub allow_sharing: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub custom_footer: Option<Option<String>>,
}

impl DisplaySettings {
    /// Return a copy with the patch applied
    pub fn patched(&self, update: &DisplaySettingsUpdate) -> Self {
        Self {
            show_prices: update.show_prices.unwrap_or(self.show_prices),
            show_descriptions: update.show_descriptions.unwrap_or(self.show_descriptions),
            show_images: update.show_images.unwrap_or(self.show_images),
            allow_sharing: update.allow_sharing.unwrap_or(self.allow_sharing),
            custom_footer: match &update.custom_footer {
                Some(footer) => footer
                    .as_ref()
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty()),
                None => self.custom_footer.clone(),
            },
        }
    }
}

/// A named, ordered group of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A single menu entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Non-negative, displayed with two decimals
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Provenance of `image_url`; meaningless when there is no image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
}

impl Item {
    /// The stored image, if any
    pub fn image(&self) -> Option<ItemImage> {
        self.image_url.as_ref().map(|url| ItemImage {
            url: url.clone(),
            source: self.image_type.unwrap_or(ImageType::Url),
        })
    }

    /// Replace the image; `None` clears both url and provenance
    pub fn set_image(&mut self, image: Option<ItemImage>) {
        match image {
            Some(img) => {
                self.image_url = Some(img.url);
                self.image_type = Some(img.source);
            }
            None => {
                self.image_url = None;
                self.image_type = None;
            }
        }
    }
}

/// Which path produced an item's image URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Uploaded through the blob store
    Upload,
    /// Externally linked URL
    Url,
}

/// An item image together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemImage {
    pub url: String,
    pub source: ImageType,
}

/// Fields for a new item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    /// Defaults to zero
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ItemImage>,
}

/// Patch for an existing item; absent fields are left untouched
///
/// `description: Some(None)` and `image: Some(None)` clear the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<ItemImage>>,
}

impl ItemPatch {
    /// True if the patch changes the item image
    pub fn touches_image(&self) -> bool {
        self.image.is_some()
    }
}
