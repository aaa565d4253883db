//! Fragment contribution model and the tag dispatcher.
//!
//! A [`FragmentContribution`] is one piece of GLSL source addressed at a slot
//! (vertex stage, fragment stage, or the shared pseudo-stage) and a target
//! within that slot (the stage head, the stage's default anchor, or a named
//! anchor). Contributions are produced by the declarative layer — either the
//! tag factories [`vert`] / [`frag`] / [`shared`] or a loaded
//! [`MaterialDoc`](crate::dsl::MaterialDoc) — and consumed exactly once by
//! [`collect`](super::collect::collect).

use serde::{Deserialize, Serialize};

/// Anchor that receives vertex-stage contributions addressed at `body`.
pub const DEFAULT_VERT_CHUNK: &str = "project_vertex";

/// Anchor that receives fragment-stage contributions addressed at `body`.
pub const DEFAULT_FRAG_CHUNK: &str = "dithering_fragment";

/// A compiled stage of the shading program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// The anchor name that `body`-targeted contributions resolve to.
    ///
    /// Kept as an explicit per-stage lookup so the `body` convention lives in
    /// one place.
    pub fn default_anchor(self) -> &'static str {
        match self {
            Stage::Vertex => DEFAULT_VERT_CHUNK,
            Stage::Fragment => DEFAULT_FRAG_CHUNK,
        }
    }

    /// Short label used in logs and documents.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Vertex => "vert",
            Stage::Fragment => "frag",
        }
    }
}

/// Where a contribution lands: one stage, or both via the shared pseudo-stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Stage(Stage),
    Shared,
}

/// Target within a slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkTarget {
    /// Text prepended before the stage's base source.
    Head,
    /// The stage's default anchor (see [`Stage::default_anchor`]).
    Body,
    /// An arbitrary anchor name; the space of names is open, not an enum.
    Named(String),
}

impl ChunkTarget {
    /// Resolve an accessed key into a target: `"head"` and `"body"` are the
    /// two reserved names, anything else addresses that anchor verbatim.
    pub fn from_key(key: &str) -> ChunkTarget {
        match key {
            "head" => ChunkTarget::Head,
            "body" => ChunkTarget::Body,
            other => ChunkTarget::Named(other.to_string()),
        }
    }

    /// The anchor name this target resolves to for `stage`, or `None` for
    /// head text (which has no anchor).
    pub fn anchor_name(&self, stage: Stage) -> Option<&str> {
        match self {
            ChunkTarget::Head => None,
            ChunkTarget::Body => Some(stage.default_anchor()),
            ChunkTarget::Named(name) => Some(name),
        }
    }
}

/// One immutable contribution of shader source text.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentContribution {
    pub slot: Slot,
    pub target: ChunkTarget,
    pub text: String,
    /// When true, the anchor's original content is discarded instead of kept.
    pub replace: bool,
}

/// An addressed-but-empty contribution: the product of the tag dispatcher.
///
/// Carries `{slot, target}` metadata; attach source text with
/// [`FragmentTag::text`] or [`FragmentTag::replace`].
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentTag {
    pub slot: Slot,
    pub target: ChunkTarget,
}

impl FragmentTag {
    /// Finish the tag into an appending contribution.
    pub fn text(self, text: impl Into<String>) -> FragmentContribution {
        FragmentContribution {
            slot: self.slot,
            target: self.target,
            text: text.into(),
            replace: false,
        }
    }

    /// Finish the tag into a replacing contribution: the anchor's original
    /// content is dropped from the assembled source.
    pub fn replace(self, text: impl Into<String>) -> FragmentContribution {
        FragmentContribution {
            slot: self.slot,
            target: self.target,
            text: text.into(),
            replace: true,
        }
    }
}

/// Tag a vertex-stage contribution. `key` follows [`ChunkTarget::from_key`].
pub fn vert(key: &str) -> FragmentTag {
    FragmentTag {
        slot: Slot::Stage(Stage::Vertex),
        target: ChunkTarget::from_key(key),
    }
}

/// Tag a fragment-stage contribution. `key` follows [`ChunkTarget::from_key`].
pub fn frag(key: &str) -> FragmentTag {
    FragmentTag {
        slot: Slot::Stage(Stage::Fragment),
        target: ChunkTarget::from_key(key),
    }
}

/// Tag a shared contribution, injected into both stages ahead of their heads.
pub fn shared() -> FragmentTag {
    FragmentTag {
        slot: Slot::Shared,
        target: ChunkTarget::Body,
    }
}
