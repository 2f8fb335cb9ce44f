pub mod clock;
pub mod farm_manager;
pub mod services;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use farm_manager::FarmManager;
