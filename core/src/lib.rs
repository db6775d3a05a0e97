pub mod config;
pub mod import;
pub mod plugin;
pub mod pool;
pub mod song;
pub mod time;
