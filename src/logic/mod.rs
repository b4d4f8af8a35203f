pub mod alerts;
pub mod calculations;
pub mod irrigation;
pub mod normalizer;
pub mod schedule;
pub mod trend;

pub use alerts::evaluate_moisture_alert;
pub use irrigation::calculate_irrigation_need;
pub use normalizer::to_moisture_index;
pub use schedule::generate_irrigation_schedule;
pub use trend::analyze_trend;
