mod app;
pub use app::*;

pub mod canvas;
pub mod input;
pub mod restart;
