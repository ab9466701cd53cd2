pub mod data;

pub use data::body::*;
pub use data::flower::*;
pub use data::scene::*;
