mod error;
mod minimap;
mod renderer;
mod video;

pub use error::RenderError;
pub use renderer::VideoRenderer;
