pub mod commands;
pub mod guide;
pub mod rates;
pub mod setup;
pub mod shell;
pub mod ui;
