pub mod enums;
pub mod identity;
pub mod models;

pub use enums::*;
pub use identity::*;
pub use models::*;
