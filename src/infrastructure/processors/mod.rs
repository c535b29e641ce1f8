// Processors module
pub mod css_modules;
pub mod css_plugins;
pub mod css_processor;
pub mod dev_css;
pub mod js_processor;
pub mod minifier;
pub mod scss_processor;
pub mod svg_processor;

pub use css_modules::*;
pub use css_plugins::*;
pub use css_processor::*;
pub use dev_css::*;
pub use js_processor::*;
pub use minifier::*;
pub use scss_processor::*;
pub use svg_processor::*;
