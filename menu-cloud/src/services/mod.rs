//! Request-independent operations shared by the HTTP handlers

pub mod images;
pub mod restaurant;
