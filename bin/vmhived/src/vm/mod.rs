pub mod port;
pub mod controller;
pub mod reaper;
pub mod importer;

pub use controller::*;
pub use reaper::*;
pub use importer::*;
