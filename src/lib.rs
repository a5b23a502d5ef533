pub mod api;
pub mod auth_form;
pub mod banner;
pub mod config;
pub mod dates;
pub mod errors;
pub mod guard;
pub mod logging;
pub mod metrics;
pub mod releases;
pub mod session;
pub mod ui;
