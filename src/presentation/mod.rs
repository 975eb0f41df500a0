// Presentation layer - SVG panels and text captions
pub mod map_svg;
pub mod status;
