pub mod app_settings;
pub mod app_state;
pub mod confirm;
pub mod entities;
pub mod form;
pub mod list;
pub mod messages;
pub mod network;
pub mod validation;
pub mod view;
