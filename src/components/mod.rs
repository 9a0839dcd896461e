pub mod app;
pub mod touch_button;
