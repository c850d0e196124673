//! Dashboard editing session
//!
//! Holds snapshots of one restaurant and its menu. State changes only through
//! mutation-engine results that the store has accepted: a rejected or failed
//! write leaves the snapshots exactly as they were.

use std::sync::Arc;

use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{DisplaySettings, DisplaySettingsUpdate, Menu, Restaurant, RestaurantUpdate, Section};

use crate::db;
use crate::db::menus::CreateMenu;
use crate::error::{ServiceError, ServiceResult};
use crate::gate::{self, Feature};
use crate::menu::MenuCommand;
use crate::services::restaurant::{validate_email, validate_name, validate_theme_color};
use crate::store::{DocumentStore, Fields, MENUS, StoreError};

/// Attempts for a server-side command before reporting a conflict
const MAX_WRITE_ATTEMPTS: usize = 3;

enum MenuWrite {
    Sections(Vec<Section>),
    Settings(DisplaySettings),
}

pub struct DashboardSession {
    store: Arc<dyn DocumentStore>,
    restaurant: Restaurant,
    menu: Option<Menu>,
}

impl DashboardSession {
    pub async fn load(store: Arc<dyn DocumentStore>, restaurant_id: &str) -> ServiceResult<Self> {
        let (restaurant, menu) = db::load_restaurant_and_menu(store.as_ref(), restaurant_id).await?;
        Ok(Self {
            store,
            restaurant,
            menu,
        })
    }

    pub fn restaurant(&self) -> &Restaurant {
        &self.restaurant
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    /// Re-read both snapshots (e.g. after a subscription change)
    pub async fn reload(&mut self) -> ServiceResult<()> {
        let (restaurant, menu) =
            db::load_restaurant_and_menu(self.store.as_ref(), &self.restaurant.id).await?;
        self.restaurant = restaurant;
        self.menu = menu;
        Ok(())
    }

    /// Create the restaurant's menu; `MenuAlreadyExists` if there is one
    pub async fn create_menu(&mut self) -> ServiceResult<&Menu> {
        match db::menus::create(self.store.as_ref(), &self.restaurant.id).await? {
            CreateMenu::Created(menu) => {
                tracing::info!(restaurant_id = %self.restaurant.id, menu_id = %menu.id, "Menu created");
                Ok(self.menu.insert(menu))
            }
            CreateMenu::AlreadyExists(existing) => {
                self.menu = Some(existing);
                Err(AppError::new(ErrorCode::MenuAlreadyExists)
                    .with_detail("restaurant_id", self.restaurant.id.clone())
                    .into())
            }
        }
    }

    /// Gate, apply and persist one menu command
    ///
    /// With `expected_version` the write is pinned to that version and a
    /// mismatch is a conflict. Without it, the command is re-applied to a
    /// fresh read on conflict, up to a few times.
    pub async fn apply(
        &mut self,
        command: &MenuCommand,
        expected_version: Option<u64>,
    ) -> ServiceResult<&Menu> {
        gate::check_command(&self.restaurant, command)?;

        self.commit(expected_version, |menu| {
            let next = command.apply(&menu.sections)?;
            Ok((next != menu.sections).then_some(MenuWrite::Sections(next)))
        })
        .await?;

        tracing::debug!(
            restaurant_id = %self.restaurant.id,
            command = command.kind(),
            "Menu command applied"
        );
        self.current_menu()
    }

    pub async fn update_settings(
        &mut self,
        patch: &DisplaySettingsUpdate,
        expected_version: Option<u64>,
    ) -> ServiceResult<&Menu> {
        gate::ensure_allowed(&self.restaurant, Feature::MenuSettings)?;

        self.commit(expected_version, |menu| {
            let next = menu.settings.patched(patch);
            Ok((next != menu.settings).then_some(MenuWrite::Settings(next)))
        })
        .await?;
        self.current_menu()
    }

    /// Profile edit; theme color and logo need `branding`
    ///
    /// The slug is kept on rename so printed QR codes stay valid.
    pub async fn update_profile(&mut self, update: &RestaurantUpdate) -> ServiceResult<&Restaurant> {
        if update.touches_branding() {
            gate::ensure_allowed(&self.restaurant, Feature::Branding)?;
        }
        if update.is_empty() {
            return Ok(&self.restaurant);
        }

        let mut fields = Fields::new();
        if let Some(name) = &update.name {
            fields.insert("name".into(), json!(validate_name(name)?));
        }
        if let Some(email) = &update.email {
            fields.insert("email".into(), json!(validate_email(email)?));
        }
        if let Some(location) = &update.location {
            fields.insert("location".into(), json!(location.trim()));
        }
        if let Some(color) = &update.theme_color {
            fields.insert("themeColor".into(), json!(validate_theme_color(color)?));
        }
        if let Some(logo) = &update.logo_url {
            let logo = logo
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map_or(Value::Null, |u| json!(u));
            fields.insert("logoUrl".into(), logo);
        }

        db::restaurants::update_fields(self.store.as_ref(), &self.restaurant.id, fields).await?;
        self.restaurant = db::restaurants::get(self.store.as_ref(), &self.restaurant.id).await?;
        Ok(&self.restaurant)
    }

    fn current_menu(&self) -> ServiceResult<&Menu> {
        self.menu
            .as_ref()
            .ok_or_else(|| AppError::menu_not_found(self.restaurant.id.clone()).into())
    }

    /// Optimistic read-modify-write loop around one menu write
    ///
    /// `build` returns `None` when the change is a no-op; nothing is written.
    async fn commit<F>(&mut self, expected_version: Option<u64>, mut build: F) -> ServiceResult<()>
    where
        F: FnMut(&Menu) -> ServiceResult<Option<MenuWrite>>,
    {
        let mut base = self.current_menu()?.clone();
        if expected_version.is_some_and(|v| v != base.version) {
            return Err(StoreError::version_conflict(MENUS, &base.id).into());
        }

        let attempts = if expected_version.is_some() {
            1
        } else {
            MAX_WRITE_ATTEMPTS
        };

        for attempt in 1..=attempts {
            let Some(write) = build(&base)? else {
                self.menu = Some(base);
                return Ok(());
            };

            let store = self.store.as_ref();
            let result = match &write {
                MenuWrite::Sections(sections) => {
                    db::menus::apply_mutation(store, &base.id, base.version, sections).await
                }
                MenuWrite::Settings(settings) => {
                    db::menus::update_settings(store, &base.id, base.version, settings).await
                }
            };

            match result {
                Ok(saved) => {
                    self.menu = Some(saved);
                    return Ok(());
                }
                Err(StoreError::VersionConflict { .. }) if attempt < attempts => {
                    tracing::info!(menu_id = %base.id, attempt, "Menu changed concurrently, retrying");
                    base = db::menus::get(store, &base.id).await?;
                }
                Err(e) => return Err(ServiceError::from(e)),
            }
        }

        Err(StoreError::version_conflict(MENUS, &base.id).into())
    }
}
