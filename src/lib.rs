pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod quiz;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod testing;
