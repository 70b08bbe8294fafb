//! The editor store: the single owner of blocks, edges and editor state.
//!
//! [`EditorStore`] is an explicit value, not a global. Create one per editing
//! session (and call [`EditorStore::clear_all`] when switching repositories).
//! Every mutating method takes `&mut self`, validates its precondition, and
//! either commits completely or returns an error with the store unchanged.
//! Outcomes worth showing to the author are also queued as [`Notice`]s.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audit;
use crate::config::EditorConfig;
use crate::digest::{self, DigestError};
use crate::error::StoreError;
use crate::graph::LinkGraph;
use crate::layout;
use crate::notice::Notice;
use crate::ordering;
use crate::registry::BlockRegistry;
use crate::types::{
    AuditResult, BlockDraft, BlockPatch, BlockStatus, BlockType, Edge, Position, ProofBlock,
};
use crate::validation::{self, ValidationError};

/// A read-only copy of the whole store, suitable for handing to the UI or
/// writing to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_block_id: Option<String>,

    /// Blocks in registry (insertion) order.
    #[serde(default)]
    pub blocks: Vec<ProofBlock>,

    /// Edges in insertion order.
    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_block_id: Option<String>,

    #[serde(default)]
    pub drawer_open: bool,
}

impl EditorSnapshot {
    /// Parse a snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialise to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// What [`EditorStore::restore`] managed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub blocks: usize,
    pub edges: usize,
    /// Blocks or edges that were refused, with the reason.
    pub rejected: Vec<StoreError>,
}

/// The in-memory proof-block graph plus the editor's selection state.
#[derive(Debug, Default)]
pub struct EditorStore {
    config: EditorConfig,
    registry: BlockRegistry,
    graph: LinkGraph,
    start_block_id: Option<String>,
    selected_block_id: Option<String>,
    drawer_open: bool,
    notices: Vec<Notice>,
}

impl EditorStore {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- read side -----------------------------------------------------------

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Blocks in registry (insertion) order.
    pub fn blocks(&self) -> impl Iterator<Item = &ProofBlock> {
        self.registry.blocks()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn get_block(&self, id: &str) -> Option<&ProofBlock> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &LinkGraph {
        &self.graph
    }

    pub fn start_block_id(&self) -> Option<&str> {
        self.start_block_id.as_deref()
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// The canonical sequence: every block exactly once. See
    /// [`ordering`](crate::ordering) for the rules.
    pub fn ordered_blocks(&self) -> Vec<&ProofBlock> {
        ordering::ordered_blocks(&self.registry, &self.graph, self.start_block_id())
    }

    /// Ids of [`EditorStore::ordered_blocks`].
    pub fn ordered_ids(&self) -> Vec<&str> {
        ordering::ordered_ids(&self.registry, &self.graph, self.start_block_id())
    }

    /// Digest of the canonical sequence; the value published for a repository.
    pub fn sequence_digest(&self) -> Result<String, DigestError> {
        digest::sequence_digest(self.ordered_blocks())
    }

    /// Copy the whole store state.
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            start_block_id: self.start_block_id.clone(),
            blocks: self.registry.blocks().cloned().collect(),
            edges: self.graph.edges().to_vec(),
            selected_block_id: self.selected_block_id.clone(),
            drawer_open: self.drawer_open,
        }
    }

    /// Queued notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take every queued notice, leaving the queue empty.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- blocks --------------------------------------------------------------

    /// Create a block of `block_type`.
    ///
    /// Fields missing from `draft` take their defaults: empty title and
    /// description, status in review, empty content, the configured default
    /// position. A `draft.id` is kept verbatim (hydration from a remote
    /// record) and suppresses the "created" notice.
    ///
    /// When `parent_id` is given the store also tries to link parent → new
    /// block. A refused link is reported as a warning notice; the block is
    /// created regardless. The first block of an empty start marker becomes
    /// the start block, and the new block becomes the selection.
    pub fn add_block(
        &mut self,
        block_type: BlockType,
        parent_id: Option<&str>,
        draft: Option<BlockDraft>,
    ) -> Result<ProofBlock, StoreError> {
        let draft = draft.unwrap_or_default();
        let hydrated = draft.id.is_some();

        let mut block = match draft.id {
            Some(id) => ProofBlock::with_id(id, block_type),
            None => ProofBlock::new(block_type),
        };
        if self.registry.contains(&block.id) {
            return Err(StoreError::IdConflict(block.id));
        }
        if let Some(content) = draft.content {
            validation::validate_content(block_type, &content)?;
            block.content = content;
        }
        if let Some(title) = draft.title {
            block.title = title;
        }
        if let Some(description) = draft.description {
            block.description = description;
        }
        if let Some(status) = draft.status {
            block.status = status;
        }
        block.audit_summary = draft.audit_summary;
        block.position = draft.position.unwrap_or(self.config.default_position);
        if let Some(created_at) = draft.created_at {
            block.created_at = created_at;
        }

        self.registry
            .insert(block.clone())
            .map_err(|b| StoreError::IdConflict(b.id))?;
        self.selected_block_id = Some(block.id.clone());
        info!(id = %block.id, block_type = %block_type, "block added");

        if let Some(parent) = parent_id {
            if let Err(e) = self.connect(parent, &block.id) {
                warn!(parent, child = %block.id, "auto-link refused: {e}");
                self.notices.push(Notice::warning(e.to_string()));
            }
        }

        if self.start_block_id.is_none() {
            self.start_block_id = Some(block.id.clone());
        }

        if !hydrated {
            self.notices
                .push(Notice::success(format!("{} block created", block_type.label())));
        }

        Ok(block)
    }

    /// Create a block linked after the last block of the canonical sequence.
    pub fn append_block(
        &mut self,
        block_type: BlockType,
        draft: Option<BlockDraft>,
    ) -> Result<ProofBlock, StoreError> {
        let parent = self.ordered_ids().last().map(|id| id.to_string());
        self.add_block(block_type, parent.as_deref(), draft)
    }

    /// Merge author-editable fields into an existing block.
    ///
    /// Status and audit summary are not reachable from here; see
    /// [`EditorStore::apply_audit_result`]. Content of the wrong kind for the
    /// block's type is refused.
    pub fn update_block(&mut self, id: &str, patch: BlockPatch) -> Result<ProofBlock, StoreError> {
        let Some(block) = self.registry.get_mut(id) else {
            debug!(id, "update of unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };
        if let Some(content) = &patch.content {
            validation::validate_content(block.block_type, content)?;
        }

        if let Some(title) = patch.title {
            block.title = title;
        }
        if let Some(description) = patch.description {
            block.description = description;
        }
        if let Some(content) = patch.content {
            block.content = content;
        }
        if let Some(position) = patch.position {
            block.position = position;
        }
        debug!(id, "block updated");
        Ok(block.clone())
    }

    /// Move a block on the canvas. Presentation only.
    pub fn update_block_position(&mut self, id: &str, position: Position) -> Result<(), StoreError> {
        let Some(block) = self.registry.get_mut(id) else {
            debug!(id, "move of unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };
        block.position = position;
        Ok(())
    }

    /// Remove a block and every edge touching it.
    ///
    /// Clears the start marker and the selection when they pointed at the
    /// block. Returns the removed block.
    pub fn delete_block(&mut self, id: &str) -> Result<ProofBlock, StoreError> {
        let Some(block) = self.registry.remove(id) else {
            debug!(id, "delete of unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };
        let removed_edges = self.graph.remove_touching(id);

        if self.start_block_id.as_deref() == Some(id) {
            self.start_block_id = None;
        }
        if self.selected_block_id.as_deref() == Some(id) {
            self.selected_block_id = None;
            self.drawer_open = false;
        }

        info!(id, edges = removed_edges.len(), "block deleted");
        self.notices
            .push(Notice::success(format!("{} deleted", block.display_title())));
        Ok(block)
    }

    /// Copy a block under a fresh id.
    ///
    /// Content and description are copied; the title gets the configured copy
    /// suffix; status returns to review and the audit summary is dropped. No
    /// edges are copied.
    pub fn duplicate_block(&mut self, id: &str) -> Result<ProofBlock, StoreError> {
        let Some(original) = self.registry.get(id) else {
            debug!(id, "duplicate of unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };

        let mut copy = ProofBlock::new(original.block_type);
        copy.title = if original.title.is_empty() {
            format!("Untitled{}", self.config.copy_suffix)
        } else {
            format!("{}{}", original.title, self.config.copy_suffix)
        };
        copy.description = original.description.clone();
        copy.content = original.content.clone();
        copy.status = BlockStatus::PendingReview;
        copy.audit_summary = None;
        let offset = self.config.duplicate_offset;
        copy.position = original.position.offset(offset, offset);
        let message = format!("{} duplicated", original.display_title());

        self.registry
            .insert(copy.clone())
            .map_err(|b| StoreError::IdConflict(b.id))?;
        info!(source = id, id = %copy.id, "block duplicated");
        self.notices.push(Notice::success(message));
        Ok(copy)
    }

    /// Mark `id` as the head of the canonical sequence, or clear the marker.
    pub fn set_start_block(&mut self, id: Option<&str>) -> Result<(), StoreError> {
        if let Some(id) = id {
            if !self.registry.contains(id) {
                debug!(id, "start marker on unknown block ignored");
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        self.start_block_id = id.map(str::to_string);
        self.notices.push(Notice::success("Start block updated"));
        Ok(())
    }

    /// Select a block, or clear the selection.
    pub fn select_block(&mut self, id: Option<&str>) -> Result<(), StoreError> {
        if let Some(id) = id {
            if !self.registry.contains(id) {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        self.selected_block_id = id.map(str::to_string);
        Ok(())
    }

    /// Open the details drawer, on `id` if given, else on the current
    /// selection.
    pub fn open_drawer(&mut self, id: Option<&str>) -> Result<(), StoreError> {
        if id.is_some() {
            self.select_block(id)?;
        }
        self.drawer_open = true;
        Ok(())
    }

    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    /// Reset to an empty editor. Configuration and queued notices survive.
    pub fn clear_all(&mut self) {
        self.registry.clear();
        self.graph.clear();
        self.start_block_id = None;
        self.selected_block_id = None;
        self.drawer_open = false;
        debug!("store cleared");
    }

    // --- edges ---------------------------------------------------------------

    /// Link `source -> target`.
    ///
    /// Both ends must be registered blocks. Self-loops, duplicates and links
    /// that would close a cycle are refused with a warning notice naming the
    /// reason.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<Edge, StoreError> {
        match self.connect(source, target) {
            Ok(edge) => Ok(edge),
            Err(e) => {
                warn!(source, target, "connection refused: {e}");
                self.notices.push(Notice::warning(e.to_string()));
                Err(e)
            }
        }
    }

    /// Remove an edge by id.
    pub fn remove_edge(&mut self, edge_id: &str) -> Result<Edge, StoreError> {
        match self.graph.remove_edge(edge_id) {
            Some(edge) => {
                debug!(edge_id, "edge removed");
                Ok(edge)
            }
            None => {
                debug!(edge_id, "removal of unknown edge ignored");
                Err(StoreError::EdgeNotFound(edge_id.to_string()))
            }
        }
    }

    /// Link every consecutive pair of the canonical sequence that is not
    /// linked yet. Returns how many edges were added.
    pub fn link_sequentially(&mut self) -> usize {
        let pairs: Vec<(String, String)> = layout::sequential_pairs(&self.ordered_blocks())
            .into_iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();

        let mut added = 0;
        for (source, target) in pairs {
            if self.graph.contains(&source, &target) {
                continue;
            }
            if self.add_edge(&source, &target).is_ok() {
                added += 1;
            }
        }
        added
    }

    /// Lay the canonical sequence out on one row.
    pub fn apply_inline_layout(&mut self) {
        let placed: Vec<(String, Position)> =
            layout::inline_positions(&self.ordered_blocks(), &self.config.layout)
                .into_iter()
                .map(|(id, p)| (id.to_string(), p))
                .collect();
        for (id, position) in placed {
            if let Some(block) = self.registry.get_mut(&id) {
                block.position = position;
            }
        }
    }

    // --- validation and audit ------------------------------------------------

    /// Check a block before saving it. A failure is also queued as an error
    /// notice.
    pub fn validate_block(&mut self, block: &ProofBlock) -> Result<(), ValidationError> {
        validation::validate_block(block).inspect_err(|e| {
            self.notices.push(Notice::error(e.to_string()));
        })
    }

    /// Run the local audit preview on a stored block and record its result.
    ///
    /// This is a placeholder until the audit service answers; its decision is
    /// overwritten by [`EditorStore::apply_audit_result`].
    pub fn request_audit_preview(&mut self, id: &str) -> Result<ProofBlock, StoreError> {
        let min_len = self.config.min_audit_title_len;
        let Some(block) = self.registry.get_mut(id) else {
            debug!(id, "audit preview of unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };

        let preview = match audit::preview(block, min_len) {
            Ok(p) => p,
            Err(e) => {
                self.notices
                    .push(Notice::error("Please set a Title before requesting AI audit."));
                return Err(e.into());
            }
        };
        block.status = preview.status;
        block.audit_summary = Some(preview.summary);
        let updated = block.clone();

        self.notices.push(Notice::info("AI audit completed (demo)."));
        Ok(updated)
    }

    /// Record the audit service's decision. Touches only status and summary.
    pub fn apply_audit_result(&mut self, result: AuditResult) -> Result<(), StoreError> {
        let Some(block) = self.registry.get_mut(&result.block_id) else {
            debug!(id = %result.block_id, "audit result for unknown block ignored");
            return Err(StoreError::NotFound(result.block_id));
        };
        block.status = result.status;
        block.audit_summary = result.summary;
        info!(id = %block.id, status = %block.status, "audit result applied");
        Ok(())
    }

    // --- remote round trips --------------------------------------------------

    /// Swap a locally minted block for the record the server returned.
    ///
    /// The block keeps its slot in registry order, and every edge endpoint,
    /// the start marker and the selection that named `old_id` are rewritten to
    /// `new_record.id`.
    pub fn replace_id(&mut self, old_id: &str, new_record: ProofBlock) -> Result<(), StoreError> {
        if !self.registry.contains(old_id) {
            debug!(old_id, "replace of unknown block ignored");
            return Err(StoreError::NotFound(old_id.to_string()));
        }
        if new_record.id != old_id && self.registry.contains(&new_record.id) {
            return Err(StoreError::IdConflict(new_record.id));
        }
        validation::validate_content(new_record.block_type, &new_record.content)?;

        let new_id = new_record.id.clone();
        if !self.registry.replace(old_id, new_record) {
            return Err(StoreError::IdConflict(new_id));
        }
        if new_id != old_id {
            self.graph.rename_block(old_id, &new_id);
            if self.start_block_id.as_deref() == Some(old_id) {
                self.start_block_id = Some(new_id.clone());
            }
            if self.selected_block_id.as_deref() == Some(old_id) {
                self.selected_block_id = Some(new_id.clone());
            }
        }
        info!(old_id, new_id = %new_id, "block id replaced");
        Ok(())
    }

    /// Replace the editor contents with blocks fetched from a remote source.
    ///
    /// Ids, status and summaries are kept. Records that cannot be added (for
    /// example a repeated id) are skipped with a warning notice. Returns the
    /// number of blocks loaded.
    pub fn hydrate(&mut self, records: impl IntoIterator<Item = ProofBlock>) -> usize {
        self.clear_all();
        let mut loaded = 0;
        for record in records {
            if self.hydrate_one(record).is_ok() {
                loaded += 1;
            }
        }
        loaded
    }

    /// Rebuild the store from a snapshot.
    ///
    /// Blocks are hydrated; edges are re-inserted through the cycle guard, so
    /// a snapshot carrying a cycle, duplicate or dangling edge loses those
    /// edges (each reported in the returned report and as a warning notice).
    /// The start marker, selection and drawer state are restored when they
    /// still refer to a loaded block.
    pub fn restore(&mut self, snapshot: EditorSnapshot) -> RestoreReport {
        self.clear_all();
        let mut report = RestoreReport::default();

        for record in snapshot.blocks {
            match self.hydrate_one(record) {
                Ok(()) => report.blocks += 1,
                Err(e) => report.rejected.push(e),
            }
        }
        for edge in snapshot.edges {
            match self.add_edge(&edge.source, &edge.target) {
                Ok(_) => report.edges += 1,
                Err(e) => report.rejected.push(e),
            }
        }

        self.start_block_id = snapshot
            .start_block_id
            .filter(|id| self.registry.contains(id));
        self.selected_block_id = snapshot
            .selected_block_id
            .filter(|id| self.registry.contains(id));
        self.drawer_open = snapshot.drawer_open && self.selected_block_id.is_some();

        info!(
            blocks = report.blocks,
            edges = report.edges,
            rejected = report.rejected.len(),
            "snapshot restored"
        );
        report
    }

    // --- helpers -------------------------------------------------------------

    fn connect(&mut self, source: &str, target: &str) -> Result<Edge, StoreError> {
        for end in [source, target] {
            if !self.registry.contains(end) {
                return Err(StoreError::UnknownBlock(end.to_string()));
            }
        }
        let edge = self.graph.add_edge(source, target)?;
        debug!(edge_id = %edge.id, "edge added");
        Ok(edge)
    }

    fn hydrate_one(&mut self, record: ProofBlock) -> Result<(), StoreError> {
        let block_type = record.block_type;
        let result = self.add_block(block_type, None, Some(BlockDraft::from(record)));
        if let Err(e) = &result {
            warn!("hydration skipped a record: {e}");
            self.notices.push(Notice::warning(e.to_string()));
        }
        result.map(|_| ())
    }
}

// --- tests -------------------------------------------------------------------
