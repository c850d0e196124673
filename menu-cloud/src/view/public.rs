//! Public menu page projection

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shared::models::{Item, Menu, Restaurant, Section};

use crate::qr;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMenuView {
    pub restaurant: PublicRestaurant,
    pub sections: Vec<PublicSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_footer: Option<String>,
    /// Present only when sharing is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    pub last_updated: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRestaurant {
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub theme_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSection {
    pub id: String,
    pub name: String,
    pub items: Vec<PublicItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicItem {
    pub id: String,
    pub name: String,
    /// Two decimals, e.g. `"4.50"`; omitted when prices are hidden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Two-decimal price label, half-cents rounded away from zero
fn display_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Project a restaurant and its menu for the public page, honoring the
/// menu's display settings. Read-only.
pub fn public_menu(restaurant: &Restaurant, menu: &Menu, origin: &str) -> PublicMenuView {
    let settings = &menu.settings;

    let item = |item: &Item| PublicItem {
        id: item.id.clone(),
        name: item.name.clone(),
        price: settings
            .show_prices
            .then(|| display_price(item.price)),
        description: item
            .description
            .clone()
            .filter(|_| settings.show_descriptions),
        image_url: item.image_url.clone().filter(|_| settings.show_images),
    };
    let section = |section: &Section| PublicSection {
        id: section.id.clone(),
        name: section.name.clone(),
        items: section.items.iter().map(item).collect(),
    };

    PublicMenuView {
        restaurant: PublicRestaurant {
            name: restaurant.name.clone(),
            location: restaurant.location.clone(),
            logo_url: restaurant.logo_url.clone(),
            theme_color: restaurant.theme_color.clone(),
        },
        sections: menu.sections.iter().map(section).collect(),
        custom_footer: settings.custom_footer.clone(),
        share_url: settings
            .allow_sharing
            .then(|| qr::menu_url(origin, &restaurant.slug)),
        last_updated: menu.updated_at,
    }
}
