//! Read-only projections of (restaurant, menu, gate) for each surface

pub mod dashboard;
pub mod flyer;
pub mod public;

pub use dashboard::{AnalyticsView, DashboardView, analytics, dashboard};
pub use flyer::render_flyer;
pub use public::{PublicMenuView, public_menu};
