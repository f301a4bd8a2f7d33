//! Demo admin application: a home page, session login and a guarded user
//! management area.

pub mod app;
pub mod controller;
