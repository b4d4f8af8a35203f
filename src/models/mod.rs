pub mod alert;
pub mod crop;
pub mod field;
pub mod forecast;
pub mod irrigation;
pub mod reading;
pub mod trend;

pub use alert::*;
pub use crop::*;
pub use field::*;
pub use forecast::*;
pub use irrigation::*;
pub use reading::*;
pub use trend::*;
