pub mod domain;
pub mod error;
pub mod render;

pub use domain::*;
pub use error::CoreError;
pub use render::{render, render_template, Placeholder, RenderedMessage};
