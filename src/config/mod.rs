pub mod policy;
pub mod settings;

pub use policy::*;
pub use settings::*;
