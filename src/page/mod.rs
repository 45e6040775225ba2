//! Block page rendering.

pub mod markup;
pub mod template;

pub use markup::{escape_html, HtmlBuilder, Markup};
pub use template::{render_block_page, BlockPageView};
