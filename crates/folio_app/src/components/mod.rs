//! Page components

pub mod bio;
pub mod blog_index;
pub mod cube;
pub mod email_link;
pub mod layout;
pub mod links;

pub use bio::render_bio_text;
pub use blog_index::BlogIndex;
pub use cube::{render_cube, Cube, CubeState};
pub use email_link::render_email_link;
pub use layout::{IndexLayout, Layout, BLOG_ROOT};
pub use links::{link_entries, render_link, render_trail, LinkEntry};
