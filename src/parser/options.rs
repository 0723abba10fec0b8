//! Pipeline options and policy switches.

use crate::events::Verbosity;

/// Lines scanned after the "Sumário" marker for the first organization heading.
pub const DEFAULT_ANCHOR_WINDOW: usize = 120;

/// Lines after the marker within which a fallback summary end is searched.
pub const DEFAULT_END_WINDOW: usize = 150;

/// Options controlling structure recovery.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Window for the summary's first organization heading
    pub anchor_window: usize,

    /// Window for the fallback summary end
    pub end_window: usize,

    /// Maximum non-blank lines captured as an item title (None = unlimited)
    pub title_line_cap: Option<usize>,

    /// Where a DOC_TYPE must sit on an item or header line
    pub type_position: TypePosition,

    /// Whether trailing content disqualifies a body header
    pub header_purity: HeaderPurity,

    /// What happens to body slices no summary item claims
    pub orphans: OrphanPolicy,

    /// Event verbosity
    pub verbosity: Verbosity,

    /// Whether batch runs use parallel processing
    pub parallel: bool,
}

impl PipelineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anchor window.
    pub fn with_anchor_window(mut self, lines: usize) -> Self {
        self.anchor_window = lines;
        self
    }

    /// Set the fallback end window.
    pub fn with_end_window(mut self, lines: usize) -> Self {
        self.end_window = lines;
        self
    }

    /// Cap captured title lines.
    pub fn with_title_line_cap(mut self, cap: Option<usize>) -> Self {
        self.title_line_cap = cap;
        self
    }

    /// Set the DOC_TYPE position rule.
    pub fn with_type_position(mut self, position: TypePosition) -> Self {
        self.type_position = position;
        self
    }

    /// Set the header purity rule.
    pub fn with_header_purity(mut self, purity: HeaderPurity) -> Self {
        self.header_purity = purity;
        self
    }

    /// Require nothing but punctuation after a header's type/number/year.
    pub fn strict_headers(mut self) -> Self {
        self.header_purity = HeaderPurity::Strict;
        self
    }

    /// Set the orphan slice policy.
    pub fn with_orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    /// Emit unclaimed body slices as fallback docs.
    pub fn keep_orphans(mut self) -> Self {
        self.orphans = OrphanPolicy::Fallback;
        self
    }

    /// Set event verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            anchor_window: DEFAULT_ANCHOR_WINDOW,
            end_window: DEFAULT_END_WINDOW,
            title_line_cap: None,
            type_position: TypePosition::Leading,
            header_purity: HeaderPurity::Loose,
            orphans: OrphanPolicy::Drop,
            verbosity: Verbosity::Info,
            parallel: true,
        }
    }
}

/// Where a DOC_TYPE span must occur for a line to start an item or header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypePosition {
    /// No word or number may precede it (bullets and punctuation may)
    #[default]
    Leading,
    /// Anywhere on the line; the first occurrence is used
    Anywhere,
}

/// Header purity rule for body headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPurity {
    /// Only punctuation may follow the type/number/year spans
    Strict,
    /// Any trailing content is allowed
    #[default]
    Loose,
}

/// Handling of body slices that no summary item claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanPolicy {
    /// Drop them
    #[default]
    Drop,
    /// Emit them as fallback docs
    Fallback,
}
