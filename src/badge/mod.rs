pub mod layout;
pub mod svg;

pub use layout::{format_magnitude, text_width, BadgeLayout};
pub use svg::render_svg;
