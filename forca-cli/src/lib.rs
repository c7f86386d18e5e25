// Library exports for the FORCA CLI
// This allows testing of internal modules

pub mod api;
pub mod backend;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod questionnaire;
pub mod services;
pub mod session;
pub mod ui;
