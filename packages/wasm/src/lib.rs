//! WebAssembly bindings for the proofgraph editor core.
//!
//! Exposes the editor to JavaScript/TypeScript via `wasm-bindgen`. Compile
//! with `wasm-pack build` to produce an npm-ready package. Structured values
//! cross the boundary as JSON strings.
//!
//! ## Stateless API — [`validate`], [`new_block`], [`render`], [`digest`]
//!
//! ```js
//! import init, { new_block, validate, render } from './proofgraph_wasm.js';
//! await init();
//!
//! const json = new_block('text', 'Intro');
//! validate(json);
//! console.log(render(JSON.stringify({ blocks: [JSON.parse(json)] })));
//! ```
//!
//! ## Editor session — [`Editor`]
//!
//! ```js
//! const editor = new Editor();
//! const intro = JSON.parse(editor.addBlock('text', null, null));
//! const fig = JSON.parse(editor.addBlock('image', intro.id, null));
//! try { editor.addEdge(fig.id, intro.id); } catch (e) { /* cycle */ }
//! for (const n of JSON.parse(editor.drainNotices())) toast(n.level, n.message);
//! const digest = editor.sequenceDigest();
//! ```

use std::fmt::Display;

use proofgraph::render::{render_block, render_sequence};
use proofgraph::{
    AuditResult, BlockDraft, BlockPatch, BlockType, EditorSnapshot, EditorStore, Position,
    ProofBlock,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// One-time initialisation called at the start of every exported function.
///
/// Installs the `console_error_panic_hook` when the feature is enabled so
/// that Rust panics are forwarded to the browser console as readable errors
/// rather than appearing as generic "unreachable" WASM traps.
fn setup() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validate a block given as a JSON string.
///
/// Returns `undefined` on success. Throws a descriptive string on failure
/// (either a JSON parse error or a validation error).
#[wasm_bindgen]
pub fn validate(json: &str) -> Result<(), JsValue> {
    setup();
    let block: ProofBlock = parse(json, "block")?;
    proofgraph::validate_block(&block).map_err(js_err)
}

/// Create a new block and return it as a pretty-printed JSON string.
///
/// `block_type` must be one of: `text`, `image`, `video`, `audio`,
/// `reference`. `draft` is an optional JSON object with any of the
/// [`BlockDraft`] fields (`description`, `content`, `position`); its `title`
/// is overridden by `title`.
///
/// The block is not validated: a fresh reference block has no record yet.
#[wasm_bindgen]
pub fn new_block(block_type: &str, title: &str, draft: Option<String>) -> Result<String, JsValue> {
    setup();
    let t = parse_type(block_type)?;
    let mut draft: BlockDraft = match draft {
        Some(json) => parse(&json, "draft")?,
        None => BlockDraft::default(),
    };
    draft.id = None;
    draft.title = Some(title.to_string());

    let mut store = EditorStore::new();
    let block = store.add_block(t, None, Some(draft)).map_err(js_err)?;
    serde_json::to_string_pretty(&block).map_err(js_err)
}

/// Render a snapshot (or a single block) as human-readable text.
///
/// A single block object is rendered in full detail; a snapshot is rendered
/// as its numbered canonical sequence.
#[wasm_bindgen]
pub fn render(json: &str) -> Result<String, JsValue> {
    setup();
    if let Ok(block) = serde_json::from_str::<ProofBlock>(json) {
        return Ok(render_block(&block));
    }
    let store = load(json)?;
    Ok(render_sequence(&store.ordered_blocks()))
}

/// Digest of a snapshot's canonical sequence, `0x` + 64 hex digits.
#[wasm_bindgen]
pub fn digest(snapshot_json: &str) -> Result<String, JsValue> {
    setup();
    load(snapshot_json)?.sequence_digest().map_err(js_err)
}

/// One editing session. Owns a single [`EditorStore`].
///
/// Every method that can fail throws a string; the store is unchanged when
/// it does. User-facing outcomes are queued and collected with
/// [`Editor::drain_notices`].
#[wasm_bindgen]
pub struct Editor {
    store: EditorStore,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Editor {
    /// Create an empty editor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        setup();
        Self {
            store: EditorStore::new(),
        }
    }

    /// Number of blocks.
    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[wasm_bindgen(getter, js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[wasm_bindgen(getter, js_name = startBlockId)]
    pub fn start_block_id(&self) -> Option<String> {
        self.store.start_block_id().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = selectedBlockId)]
    pub fn selected_block_id(&self) -> Option<String> {
        self.store.selected_block_id().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = drawerOpen)]
    pub fn drawer_open(&self) -> bool {
        self.store.is_drawer_open()
    }

    // ── blocks ────────────────────────────────────────────────────────────────

    /// Create a block, optionally linked from `parent_id`. Returns the block.
    #[wasm_bindgen(js_name = addBlock)]
    pub fn add_block(
        &mut self,
        block_type: &str,
        parent_id: Option<String>,
        draft: Option<String>,
    ) -> Result<String, JsValue> {
        let t = parse_type(block_type)?;
        let draft = draft.map(|json| parse::<BlockDraft>(&json, "draft")).transpose()?;
        let block = self
            .store
            .add_block(t, parent_id.as_deref(), draft)
            .map_err(js_err)?;
        to_json(&block)
    }

    /// Create a block linked after the last block of the sequence.
    #[wasm_bindgen(js_name = appendBlock)]
    pub fn append_block(&mut self, block_type: &str, draft: Option<String>) -> Result<String, JsValue> {
        let t = parse_type(block_type)?;
        let draft = draft.map(|json| parse::<BlockDraft>(&json, "draft")).transpose()?;
        let block = self.store.append_block(t, draft).map_err(js_err)?;
        to_json(&block)
    }

    /// Merge a [`BlockPatch`] JSON object into a block. Returns the block.
    #[wasm_bindgen(js_name = updateBlock)]
    pub fn update_block(&mut self, id: &str, patch: &str) -> Result<String, JsValue> {
        let patch: BlockPatch = parse(patch, "patch")?;
        let block = self.store.update_block(id, patch).map_err(js_err)?;
        to_json(&block)
    }

    #[wasm_bindgen(js_name = updateBlockPosition)]
    pub fn update_block_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.store
            .update_block_position(id, Position::new(x, y))
            .map_err(js_err)
    }

    /// Delete a block and every edge touching it. Returns the removed block.
    #[wasm_bindgen(js_name = deleteBlock)]
    pub fn delete_block(&mut self, id: &str) -> Result<String, JsValue> {
        let block = self.store.delete_block(id).map_err(js_err)?;
        to_json(&block)
    }

    #[wasm_bindgen(js_name = duplicateBlock)]
    pub fn duplicate_block(&mut self, id: &str) -> Result<String, JsValue> {
        let block = self.store.duplicate_block(id).map_err(js_err)?;
        to_json(&block)
    }

    /// The block with `id` as JSON, or `undefined`.
    #[wasm_bindgen(js_name = getBlock)]
    pub fn get_block(&self, id: &str) -> Result<Option<String>, JsValue> {
        self.store.get_block(id).map(to_json).transpose()
    }

    // ── edges ─────────────────────────────────────────────────────────────────

    /// Link `source -> target`. Throws on self-loops, duplicates, unknown
    /// blocks and cycles.
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<String, JsValue> {
        let edge = self.store.add_edge(source, target).map_err(js_err)?;
        to_json(&edge)
    }

    #[wasm_bindgen(js_name = removeEdge)]
    pub fn remove_edge(&mut self, edge_id: &str) -> Result<(), JsValue> {
        self.store.remove_edge(edge_id).map(|_| ()).map_err(js_err)
    }

    pub fn edges(&self) -> Result<String, JsValue> {
        to_json(self.store.edges())
    }

    #[wasm_bindgen(js_name = linkSequentially)]
    pub fn link_sequentially(&mut self) -> usize {
        self.store.link_sequentially()
    }

    #[wasm_bindgen(js_name = applyInlineLayout)]
    pub fn apply_inline_layout(&mut self) {
        self.store.apply_inline_layout();
    }

    // ── editor state ──────────────────────────────────────────────────────────

    #[wasm_bindgen(js_name = setStartBlock)]
    pub fn set_start_block(&mut self, id: Option<String>) -> Result<(), JsValue> {
        self.store.set_start_block(id.as_deref()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = selectBlock)]
    pub fn select_block(&mut self, id: Option<String>) -> Result<(), JsValue> {
        self.store.select_block(id.as_deref()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = openDrawer)]
    pub fn open_drawer(&mut self, id: Option<String>) -> Result<(), JsValue> {
        self.store.open_drawer(id.as_deref()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = closeDrawer)]
    pub fn close_drawer(&mut self) {
        self.store.close_drawer();
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) {
        self.store.clear_all();
    }

    // ── validation and audit ──────────────────────────────────────────────────

    /// Validate a stored block. Throws the reason; an error notice is queued.
    #[wasm_bindgen(js_name = validateBlock)]
    pub fn validate_block(&mut self, id: &str) -> Result<(), JsValue> {
        let block = self
            .store
            .get_block(id)
            .cloned()
            .ok_or_else(|| JsValue::from_str(&format!("block {id} not found")))?;
        self.store.validate_block(&block).map_err(js_err)
    }

    #[wasm_bindgen(js_name = requestAuditPreview)]
    pub fn request_audit_preview(&mut self, id: &str) -> Result<String, JsValue> {
        let block = self.store.request_audit_preview(id).map_err(js_err)?;
        to_json(&block)
    }

    /// Apply an [`AuditResult`] JSON object from the audit service.
    #[wasm_bindgen(js_name = applyAuditResult)]
    pub fn apply_audit_result(&mut self, result: &str) -> Result<(), JsValue> {
        let result: AuditResult = parse(result, "audit result")?;
        self.store.apply_audit_result(result).map_err(js_err)
    }

    // ── persistence round trips ───────────────────────────────────────────────

    /// Swap a local block for the server's record (block JSON).
    #[wasm_bindgen(js_name = replaceId)]
    pub fn replace_id(&mut self, old_id: &str, record: &str) -> Result<(), JsValue> {
        let record: ProofBlock = parse(record, "block")?;
        self.store.replace_id(old_id, record).map_err(js_err)
    }

    /// Replace the editor contents with a JSON array of blocks. Returns the
    /// number loaded.
    pub fn hydrate(&mut self, records: &str) -> Result<usize, JsValue> {
        let records: Vec<ProofBlock> = parse(records, "block array")?;
        Ok(self.store.hydrate(records))
    }

    /// Rebuild from a snapshot. Returns `{ blocks, edges, rejected: [..] }`.
    pub fn restore(&mut self, snapshot: &str) -> Result<String, JsValue> {
        let snapshot: EditorSnapshot = parse(snapshot, "snapshot")?;
        let report = self.store.restore(snapshot);
        let rejected: Vec<String> = report.rejected.iter().map(ToString::to_string).collect();
        let obj = serde_json::json!({
            "blocks":   report.blocks,
            "edges":    report.edges,
            "rejected": rejected,
        });
        Ok(obj.to_string())
    }

    // ── read side ─────────────────────────────────────────────────────────────

    /// Blocks in registry order.
    pub fn blocks(&self) -> Result<String, JsValue> {
        let blocks: Vec<&ProofBlock> = self.store.blocks().collect();
        to_json(&blocks)
    }

    #[wasm_bindgen(js_name = orderedBlocks)]
    pub fn ordered_blocks(&self) -> Result<String, JsValue> {
        to_json(&self.store.ordered_blocks())
    }

    #[wasm_bindgen(js_name = orderedIds)]
    pub fn ordered_ids(&self) -> Result<String, JsValue> {
        to_json(&self.store.ordered_ids())
    }

    #[wasm_bindgen(js_name = sequenceDigest)]
    pub fn sequence_digest(&self) -> Result<String, JsValue> {
        self.store.sequence_digest().map_err(js_err)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.store.snapshot().to_json().map_err(js_err)
    }

    /// Queued notices as `[{ level, message }]`, emptying the queue.
    #[wasm_bindgen(js_name = drainNotices)]
    pub fn drain_notices(&mut self) -> Result<String, JsValue> {
        to_json(&self.store.drain_notices())
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("{what} parse error: {e}")))
}

fn parse_type(s: &str) -> Result<BlockType, JsValue> {
    s.parse().map_err(|e: String| JsValue::from_str(&e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

fn load(snapshot_json: &str) -> Result<EditorStore, JsValue> {
    let snapshot = EditorSnapshot::from_json(snapshot_json)
        .map_err(|e| JsValue::from_str(&format!("snapshot parse error: {e}")))?;
    let mut store = EditorStore::new();
    store.restore(snapshot);
    Ok(store)
}
