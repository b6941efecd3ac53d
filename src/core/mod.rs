//! Controller layer: the farm manager and the pure services it drives.

pub mod farm_manager;
pub mod services;

pub use farm_manager::FarmManager;
