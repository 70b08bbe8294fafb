//! Core data types for the proof-block graph.
//!
//! This module defines the records the editor store owns: [`ProofBlock`],
//! its typed [`BlockContent`] payload, and the directed [`Edge`] between two
//! blocks. All types serialise to and from JSON so snapshots can be handed to
//! the UI layer or the CLI unchanged.

use serde::{Deserialize, Serialize};

/// The kind of content a block carries. Fixed at creation.
///
/// Serialises as a lowercase string (e.g. `"reference"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Narrative or markdown content.
    Text,
    /// A figure, photo or screenshot.
    Image,
    /// A recorded demonstration or experiment capture.
    Video,
    /// A recorded explanation, interview or sensor audio.
    Audio,
    /// A bibliographic record.
    Reference,
}

impl BlockType {
    /// All block types, in display order.
    pub const ALL: [BlockType; 5] = [
        BlockType::Text,
        BlockType::Image,
        BlockType::Video,
        BlockType::Audio,
        BlockType::Reference,
    ];

    /// Human label with a leading capital, used in notices (`"Image"`).
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Text => "Text",
            BlockType::Image => "Image",
            BlockType::Video => "Video",
            BlockType::Audio => "Audio",
            BlockType::Reference => "Reference",
        }
    }
}

/// Formats the type as its lowercase wire-format string (e.g. `"text"`).
impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockType::Text => write!(f, "text"),
            BlockType::Image => write!(f, "image"),
            BlockType::Video => write!(f, "video"),
            BlockType::Audio => write!(f, "audio"),
            BlockType::Reference => write!(f, "reference"),
        }
    }
}

/// Parses a [`BlockType`] from its lowercase wire-format string.
///
/// Returns `Err` with a descriptive message if the string is not recognised.
impl std::str::FromStr for BlockType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(BlockType::Text),
            "image" => Ok(BlockType::Image),
            "video" => Ok(BlockType::Video),
            "audio" => Ok(BlockType::Audio),
            "reference" => Ok(BlockType::Reference),
            _ => Err(format!(
                "unknown block type {:?}; expected one of: \
                 text, image, video, audio, reference",
                s
            )),
        }
    }
}

/// Review state of a block. Only the audit paths change it.
///
/// Serialises as a snake_case string; the pending state is `"in_review"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    /// Waiting for an audit decision. Default for new and duplicated blocks.
    #[default]
    #[serde(rename = "in_review")]
    PendingReview,
    Approved,
    Rejected,
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockStatus::PendingReview => write!(f, "in_review"),
            BlockStatus::Approved => write!(f, "approved"),
            BlockStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for BlockStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_review" | "pending_review" => Ok(BlockStatus::PendingReview),
            "approved" => Ok(BlockStatus::Approved),
            "rejected" => Ok(BlockStatus::Rejected),
            _ => Err(format!(
                "unknown block status {:?}; expected one of: in_review, approved, rejected",
                s
            )),
        }
    }
}

/// Payload for image, video and audio blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MediaContent {
    /// Where the media lives. Upload and hosting are handled elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// `true` for a screen capture, `false`/absent for camera or other sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_screen_capture: Option<bool>,
}

/// A structured bibliographic record carried by a reference block.
///
/// `author`, `title` and `year` are required for the block to validate;
/// `link` and `doi` are optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReferenceRecord {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

/// The type-tagged payload of a block. The variant always matches the
/// block's [`BlockType`].
///
/// Serialises with an internal `"kind"` tag, e.g.
/// `{ "kind": "text", "markdown": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockContent {
    Text {
        #[serde(default)]
        markdown: String,
    },
    Image(MediaContent),
    Video(MediaContent),
    Audio(MediaContent),
    Reference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<ReferenceRecord>,
    },
}

impl BlockContent {
    /// The empty payload appropriate to `block_type`.
    pub fn empty(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Text => BlockContent::Text {
                markdown: String::new(),
            },
            BlockType::Image => BlockContent::Image(MediaContent::default()),
            BlockType::Video => BlockContent::Video(MediaContent::default()),
            BlockType::Audio => BlockContent::Audio(MediaContent::default()),
            BlockType::Reference => BlockContent::Reference { reference: None },
        }
    }

    /// The block type this payload belongs to.
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Text { .. } => BlockType::Text,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Video(_) => BlockType::Video,
            BlockContent::Audio(_) => BlockType::Audio,
            BlockContent::Reference { .. } => BlockType::Reference,
        }
    }
}

/// Canvas coordinates of a block in the visual editor.
///
/// Presentation only: positions never affect ordering or the sequence digest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This position shifted by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A proof block: one unit of published content.
///
/// Blocks are created and mutated through [`EditorStore`](crate::EditorStore);
/// the store is the only owner. `status` and `audit_summary` change only
/// through the audit paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProofBlock {
    /// Stable identifier. UUIDv7 when minted locally; preserved verbatim when
    /// supplied by a remote source.
    pub id: String,

    /// The kind of content this block carries. Immutable after creation.
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Required before the block validates; empty while drafting.
    #[serde(default)]
    pub title: String,

    /// Optional author-provided description.
    #[serde(default)]
    pub description: String,

    /// Review state, set by the audit collaborator.
    #[serde(default)]
    pub status: BlockStatus,

    /// Audit-generated summary. Read-only from the author's point of view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_summary: Option<String>,

    /// The type-tagged payload.
    pub content: BlockContent,

    /// Canvas position.
    #[serde(default)]
    pub position: Position,

    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

impl ProofBlock {
    /// Create an empty block with a fresh UUIDv7 `id` and current UTC
    /// `created_at`.
    pub fn new(block_type: BlockType) -> Self {
        Self::with_id(uuid::Uuid::now_v7().to_string(), block_type)
    }

    /// Create an empty block with a caller-supplied id.
    pub fn with_id(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            title: String::new(),
            description: String::new(),
            status: BlockStatus::PendingReview,
            audit_summary: None,
            content: BlockContent::empty(block_type),
            position: Position::default(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The title for user-facing messages, falling back to `"Block"`.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Block"
        } else {
            &self.title
        }
    }
}

/// A directed link: `source` precedes `target` in the published sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// Derived from the ordered pair, see [`Edge::derive_id`].
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Build an edge with its id derived from `(source, target)`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: Self::derive_id(&source, &target),
            source,
            target,
        }
    }

    /// `e{source}-{target}`. Two edges between the same ordered pair always
    /// collide on id.
    pub fn derive_id(source: &str, target: &str) -> String {
        format!("e{source}-{target}")
    }

    /// Whether `id` was derived from this edge's current endpoints.
    pub fn has_derived_id(&self) -> bool {
        self.id == Self::derive_id(&self.source, &self.target)
    }

    /// Whether `block_id` is either endpoint.
    pub fn touches(&self, block_id: &str) -> bool {
        self.source == block_id || self.target == block_id
    }
}

/// Optional initial fields for a new block.
///
/// When `id` is set the block is being hydrated from a remote record: the id
/// is kept verbatim and so are `status` and `audit_summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlockDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BlockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<ProofBlock> for BlockDraft {
    fn from(b: ProofBlock) -> Self {
        Self {
            id: Some(b.id),
            title: Some(b.title),
            description: Some(b.description),
            status: Some(b.status),
            audit_summary: b.audit_summary,
            content: Some(b.content),
            position: Some(b.position),
            created_at: Some(b.created_at),
        }
    }
}

/// Fields the author may change on an existing block.
///
/// `status` and `audit_summary` are not here; those belong to
/// [`AuditResult`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// An audit decision delivered by the audit collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditResult {
    pub block_id: String,
    pub status: BlockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
