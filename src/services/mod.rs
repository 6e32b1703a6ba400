pub mod children;
pub mod error;
pub mod exposure;
pub mod items;
pub mod presets;
pub mod sessions;
pub mod stats;
pub mod themes;

pub use error::ServiceError;
