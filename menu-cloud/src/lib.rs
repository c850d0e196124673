//! menu-cloud: QR menu service for restaurants
//!
//! - Dashboard API: restaurant profile, menu editing, uploads, QR/flyer
//! - Public menu pages with view counting
//! - Stripe checkout and subscription webhooks driving premium status

pub mod api;
pub mod billing;
pub mod blob;
pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod menu;
pub mod qr;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod stripe;
pub mod view;
