mod auth;
mod calculation_callback;
mod catalog;
mod common;
mod lifecycle;
mod line_items;
