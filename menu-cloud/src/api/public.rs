//! Public menu page
//!
//! GET /api/public/menus/{slug} — counts one view per load

use axum::Json;
use axum::extract::{Path, State};

use super::ApiResult;
use crate::services::restaurant;
use crate::state::AppState;
use crate::view::{self, PublicMenuView};

pub async fn get_menu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PublicMenuView> {
    let (restaurant, menu) = restaurant::public_menu(state.store.as_ref(), &slug).await?;
    Ok(Json(view::public_menu(
        &restaurant,
        &menu,
        &state.config.public_base_url,
    )))
}
