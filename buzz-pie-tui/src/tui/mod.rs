pub mod app;
pub mod events;
pub mod pie;
pub mod theme;
pub mod ui;
