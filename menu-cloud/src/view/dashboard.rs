//! Dashboard and analytics projections

use std::collections::BTreeMap;

use serde::Serialize;
use shared::models::{Menu, Restaurant};

use crate::gate::{self, Feature};
use crate::qr;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub restaurant: Restaurant,
    /// `None` until the owner creates the menu
    pub menu: Option<Menu>,
    pub menu_url: String,
    pub features: BTreeMap<Feature, bool>,
    /// Rename/delete affordances on sections
    pub can_edit_sections: bool,
    /// Edit/delete affordances on items
    pub can_edit_items: bool,
    pub can_edit_images: bool,
}

pub fn dashboard(restaurant: &Restaurant, menu: Option<&Menu>, origin: &str) -> DashboardView {
    DashboardView {
        restaurant: restaurant.clone(),
        menu: menu.cloned(),
        menu_url: qr::menu_url(origin, &restaurant.slug),
        features: gate::availability(restaurant),
        can_edit_sections: gate::is_allowed(restaurant, Feature::UnlimitedSections),
        can_edit_items: gate::is_allowed(restaurant, Feature::UnlimitedItems),
        can_edit_images: gate::is_allowed(restaurant, Feature::ImageEditing),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub menu_views: u64,
    pub section_count: usize,
    pub item_count: usize,
}

pub fn analytics(restaurant: &Restaurant, menu: Option<&Menu>) -> AnalyticsView {
    AnalyticsView {
        menu_views: restaurant.menu_views,
        section_count: menu.map_or(0, |m| m.sections.len()),
        item_count: menu.map_or(0, Menu::item_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::{sample_menu, sample_restaurant};

    #[test]
    fn test_free_dashboard_hides_edit_affordances() {
        let view = dashboard(&sample_restaurant(), None, "http://localhost:3000");
        assert!(!view.can_edit_items);
        assert!(!view.can_edit_sections);
        assert_eq!(view.menu_url, "http://localhost:3000/r/mario-s-pizza");
        assert!(view.features.values().all(|on| !on));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["menu"].is_null());
        assert_eq!(json["features"]["analytics"], false);
    }

    #[test]
    fn test_premium_dashboard() {
        let mut r = sample_restaurant();
        r.is_premium = true;
        let menu = sample_menu();
        let view = dashboard(&r, Some(&menu), "http://localhost:3000");
        assert!(view.can_edit_items && view.can_edit_sections && view.can_edit_images);
        assert_eq!(view.menu.as_ref().map(|m| m.version), Some(menu.version));
    }

    #[test]
    fn test_analytics_counts() {
        let mut r = sample_restaurant();
        r.menu_views = 42;
        let view = analytics(&r, Some(&sample_menu()));
        assert_eq!(
            view,
            AnalyticsView {
                menu_views: 42,
                section_count: 1,
                item_count: 1,
            }
        );
        assert_eq!(analytics(&r, None).item_count, 0);
    }
}
