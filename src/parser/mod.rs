//! Sumário and body parsing.

mod headers;
mod items;
mod options;
mod range;
mod slicer;

pub use headers::DocKey;
pub use items::SummaryItemParser;
pub use options::{
    HeaderPurity, OrphanPolicy, PipelineOptions, TypePosition, DEFAULT_ANCHOR_WINDOW,
    DEFAULT_END_WINDOW,
};
pub use range::SummaryRangeLocator;
pub use slicer::BodySlicer;
