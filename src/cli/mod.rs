pub mod rates;
pub mod setup;
pub mod theme;
pub mod ui;
