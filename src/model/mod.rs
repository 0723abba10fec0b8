//! Data model for gazette structure recovery.
//!
//! Input lines flow through summary items and body slices into link
//! results, which are assembled into the docs of a per-PDF bundle.

mod bundle;
mod doc;
mod item;
mod line;
mod link;
mod slice;

pub use bundle::Bundle;
pub use doc::{Doc, Organization, Person, Provenance, Relation, RelationParty, TextSpan};
pub use item::{OrgAttribution, SummaryItem};
pub use line::{ExtractedText, Line, LineSpan, SummaryRange};
pub use link::{LinkReason, LinkResult, LinkStatus};
pub use slice::BodySlice;
