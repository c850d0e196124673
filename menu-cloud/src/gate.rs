//! Premium feature gate
//!
//! Every gated feature is currently available iff the restaurant holds a
//! premium subscription (trial included). Base operations (create menu, add
//! section, add item) are never gated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::Restaurant;

use crate::menu::MenuCommand;

/// Premium-only capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// Rename/delete existing sections
    UnlimitedSections,
    /// Edit/delete existing items
    UnlimitedItems,
    /// Change an existing item's image
    ImageEditing,
    /// Theme color and logo
    Branding,
    Analytics,
    PrintableFlyer,
    /// Public page display flags and footer
    MenuSettings,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::UnlimitedSections,
        Feature::UnlimitedItems,
        Feature::ImageEditing,
        Feature::Branding,
        Feature::Analytics,
        Feature::PrintableFlyer,
        Feature::MenuSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::UnlimitedSections => "unlimitedSections",
            Feature::UnlimitedItems => "unlimitedItems",
            Feature::ImageEditing => "imageEditing",
            Feature::Branding => "branding",
            Feature::Analytics => "analytics",
            Feature::PrintableFlyer => "printableFlyer",
            Feature::MenuSettings => "menuSettings",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_allowed(restaurant: &Restaurant, _feature: Feature) -> bool {
    restaurant.is_premium
}

/// `FeatureNotAvailable` (403) unless the feature is allowed
pub fn ensure_allowed(restaurant: &Restaurant, feature: Feature) -> Result<(), AppError> {
    if is_allowed(restaurant, feature) {
        Ok(())
    } else {
        Err(AppError::feature_not_available(feature.as_str()))
    }
}

/// Features a menu command needs before it may be committed
pub fn required_features(command: &MenuCommand) -> Vec<Feature> {
    match command {
        MenuCommand::AddSection { .. } | MenuCommand::AddItem { .. } => Vec::new(),
        MenuCommand::RenameSection { .. } | MenuCommand::DeleteSection { .. } => {
            vec![Feature::UnlimitedSections]
        }
        MenuCommand::EditItem { patch, .. } if patch.touches_image() => {
            vec![Feature::UnlimitedItems, Feature::ImageEditing]
        }
        MenuCommand::EditItem { .. } | MenuCommand::DeleteItem { .. } => {
            vec![Feature::UnlimitedItems]
        }
    }
}

pub fn check_command(restaurant: &Restaurant, command: &MenuCommand) -> Result<(), AppError> {
    required_features(command)
        .into_iter()
        .try_for_each(|feature| ensure_allowed(restaurant, feature))
}

/// Per-feature availability, for the dashboard
pub fn availability(restaurant: &Restaurant) -> BTreeMap<Feature, bool> {
    Feature::ALL
        .into_iter()
        .map(|feature| (feature, is_allowed(restaurant, feature)))
        .collect()
}
