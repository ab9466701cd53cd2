pub use nectar_core::{CollisionQuery, FlowerLogic};
pub mod agent {
    pub use nectar_core::agent::*;
}
pub mod area {
    pub use nectar_core::area::*;
}
pub mod collision {
    pub use nectar_core::collision::*;
}
pub mod config {
    pub use nectar_core::config::*;
}
pub mod env {
    pub use nectar_core::env::*;
}
pub mod error {
    pub use nectar_core::error::*;
}
pub mod index {
    pub use nectar_core::index::*;
}
pub mod observation {
    pub use nectar_core::observation::*;
}
pub mod region {
    pub use nectar_core::region::*;
}
pub mod spawn {
    pub use nectar_core::spawn::*;
}
pub mod state {
    pub use nectar_data::*;
}
