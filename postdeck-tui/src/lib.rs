// Library interface for postdeck (shared by the binary and the integration tests)
pub mod api;
pub mod app;
pub mod avatar;
pub mod config;

#[macro_use]
pub mod logging;

pub mod terminal;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;
