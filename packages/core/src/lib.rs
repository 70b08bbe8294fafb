//! Core library for proof-block editing.
//!
//! A proof is a set of typed content blocks (text, image, video, audio,
//! reference) connected by directed links into an acyclic graph. This crate
//! owns that graph, keeps it acyclic, flattens it into one canonical sequence,
//! and hashes that sequence into the digest that gets published. It is the
//! foundation for the `pgraph` CLI and the `proofgraph-wasm` bindings.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Core data types: [`ProofBlock`], [`BlockType`], [`BlockContent`], [`Edge`] |
//! | [`registry`] | Id-keyed block storage with stable insertion order |
//! | [`graph`] | Edge set with the cycle guard |
//! | [`ordering`] | Canonical linear order of the graph |
//! | [`validation`] | Save-time checks via [`validate_block`] |
//! | [`audit`] | Deterministic local audit preview |
//! | [`layout`] | Inline row layout and sequential linking |
//! | [`digest`] | SHA-256 digest of a block sequence |
//! | [`render`] | Human-readable text rendering |
//! | [`store`] | [`EditorStore`], the single owner of editor state |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use proofgraph::{BlockType, EditorStore};
//!
//! let mut store = EditorStore::new();
//! let intro = store.add_block(BlockType::Text, None, None)?;
//! let figure = store.add_block(BlockType::Image, Some(&intro.id), None)?;
//!
//! // Closing the loop is refused and reported as a warning notice.
//! assert!(store.add_edge(&figure.id, &intro.id).is_err());
//!
//! let digest = store.sequence_digest()?;
//! ```

pub mod audit;
pub mod config;
pub mod digest;
pub mod error;
pub mod graph;
pub mod layout;
pub mod notice;
pub mod ordering;
pub mod registry;
pub mod render;
pub mod store;
pub mod types;
pub mod validation;

pub use config::{EditorConfig, LayoutConfig};
pub use digest::{sequence_digest, DigestError};
pub use error::StoreError;
pub use graph::{GraphError, LinkGraph};
pub use notice::{Notice, NoticeLevel};
pub use registry::BlockRegistry;
pub use store::{EditorSnapshot, EditorStore, RestoreReport};
pub use types::{
    AuditResult, BlockContent, BlockDraft, BlockPatch, BlockStatus, BlockType, Edge, MediaContent,
    Position, ProofBlock, ReferenceRecord,
};
pub use validation::{validate_block, ValidationError};
