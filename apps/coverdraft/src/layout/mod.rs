// Letter layout: static font metrics plus greedy wrap and pagination.
// Used by the document exporter; pure CPU, no I/O.

pub mod font_metrics;
pub mod paginate;

// Re-export the public API consumed by the export adapters and main.
pub use font_metrics::{default_page_config, FontFamily, PageConfig};
pub use paginate::layout_letter;
