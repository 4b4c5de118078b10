// Template rendering: record -> document tree -> HTML.
// Everything here is pure and synchronous. Every edit re-renders the whole
// document.

pub mod blocks;
pub mod document;
pub mod html;
pub mod layouts;

pub use document::Document;
pub use html::to_html;
pub use layouts::render;
