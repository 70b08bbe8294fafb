//! End-to-end editing scenarios driven through [`EditorStore`].
//!
//! | Test | Behaviour |
//! |------|-----------|
//! | `parent_link_then_cycle_refused` | auto-link on create, cycle guard, order unchanged |
//! | `unlinked_blocks_follow_insertion_order` | fallback ordering with no start |
//! | `self_loop_refused` | self-loop guard |
//! | `reference_without_author_is_invalid` | reference completeness |
//! | `branching_graph_flattens_depth_first` | branch flattening policy |
//! | `save_round_trip_swaps_ids` | local id replaced by server record |
//! | `repository_switch_hydrates_fresh_state` | clear + hydrate |
//! | `snapshot_survives_json` | snapshot serde round trip |

use proofgraph::{
    AuditResult, BlockContent, BlockDraft, BlockStatus, BlockType, EditorSnapshot, EditorStore,
    GraphError, NoticeLevel, ProofBlock, ReferenceRecord, StoreError, ValidationError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn titled(title: &str) -> Option<BlockDraft> {
    Some(BlockDraft {
        title: Some(title.into()),
        ..BlockDraft::default()
    })
}

fn order(store: &EditorStore) -> Vec<String> {
    store.ordered_ids().into_iter().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn parent_link_then_cycle_refused() {
    let mut store = EditorStore::new();
    let x = store.add_block(BlockType::Text, None, titled("X")).unwrap();
    let y = store
        .add_block(BlockType::Image, Some(&x.id), titled("Y"))
        .unwrap();
    assert_eq!(order(&store), vec![x.id.clone(), y.id.clone()]);
    store.drain_notices();

    let edges_before = store.edges().to_vec();
    let err = store.add_edge(&y.id, &x.id).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Graph(GraphError::CycleDetected { .. })
    ));
    assert_eq!(store.edges(), edges_before.as_slice());
    assert_eq!(order(&store), vec![x.id, y.id]);

    let notices = store.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("cycle"));
}

#[test]
fn unlinked_blocks_follow_insertion_order() {
    let mut store = EditorStore::new();
    let a = store.add_block(BlockType::Text, None, None).unwrap();
    let b = store.add_block(BlockType::Audio, None, None).unwrap();
    let c = store.add_block(BlockType::Video, None, None).unwrap();
    store.set_start_block(None).unwrap();
    assert_eq!(order(&store), vec![a.id, b.id, c.id]);
}

#[test]
fn self_loop_refused() {
    let mut store = EditorStore::new();
    let a = store.add_block(BlockType::Text, None, None).unwrap();
    assert!(matches!(
        store.add_edge(&a.id, &a.id),
        Err(StoreError::Graph(GraphError::SelfLoop { .. }))
    ));
    assert!(store.edges().is_empty());
}

#[test]
fn reference_without_author_is_invalid() {
    let mut store = EditorStore::new();
    let draft = BlockDraft {
        title: Some("Sources".into()),
        content: Some(BlockContent::Reference {
            reference: Some(ReferenceRecord {
                author: String::new(),
                title: "On Computable Numbers".into(),
                year: "1936".into(),
                link: None,
                doi: None,
            }),
        }),
        ..BlockDraft::default()
    };
    let block = store
        .add_block(BlockType::Reference, None, Some(draft))
        .unwrap();

    let err = store.validate_block(&block).unwrap_err();
    assert_eq!(
        err,
        ValidationError::IncompleteReference { missing: "author" }
    );
    assert!(err.to_string().contains("author"));
}

#[test]
fn branching_graph_flattens_depth_first() {
    // root -> a -> a1, root -> b; a1 is linked before b exists
    let mut store = EditorStore::new();
    let root = store.add_block(BlockType::Text, None, titled("root")).unwrap();
    let a = store
        .add_block(BlockType::Text, Some(&root.id), titled("a"))
        .unwrap();
    let b = store
        .add_block(BlockType::Text, Some(&root.id), titled("b"))
        .unwrap();
    let a1 = store
        .add_block(BlockType::Text, Some(&a.id), titled("a1"))
        .unwrap();
    let loose = store.add_block(BlockType::Text, None, titled("loose")).unwrap();

    assert_eq!(order(&store), vec![root.id, a.id, a1.id, b.id, loose.id]);
}

#[test]
fn save_round_trip_swaps_ids() {
    let mut store = EditorStore::new();
    let first = store.add_block(BlockType::Text, None, titled("Intro")).unwrap();
    let local = store
        .append_block(BlockType::Image, titled("Figure"))
        .unwrap();
    let last = store.append_block(BlockType::Text, titled("Outro")).unwrap();
    store.select_block(Some(&local.id)).unwrap();

    let mut saved: ProofBlock = local.clone();
    saved.id = "srv-0007".into();
    store.replace_id(&local.id, saved).unwrap();

    assert_eq!(order(&store), vec![first.id.clone(), "srv-0007".into(), last.id.clone()]);
    assert_eq!(store.selected_block_id(), Some("srv-0007"));
    assert!(store.edges().iter().all(|e| !e.touches(&local.id)));

    store.request_audit_preview("srv-0007").unwrap();
    store
        .apply_audit_result(AuditResult {
            block_id: "srv-0007".into(),
            status: BlockStatus::Rejected,
            summary: Some("Figure lacks a caption.".into()),
        })
        .unwrap();
    let block = store.get_block("srv-0007").unwrap();
    assert_eq!(block.status, BlockStatus::Rejected);
    assert_eq!(block.title, "Figure");
}

#[test]
fn repository_switch_hydrates_fresh_state() {
    let mut store = EditorStore::new();
    store.add_block(BlockType::Text, None, titled("old")).unwrap();
    store.append_block(BlockType::Text, None).unwrap();

    let mut approved = ProofBlock::with_id("r-1", BlockType::Text);
    approved.title = "Loaded".into();
    approved.status = BlockStatus::Approved;
    let other = ProofBlock::with_id("r-2", BlockType::Audio);

    store.drain_notices();
    assert_eq!(store.hydrate(vec![approved, other]), 2);
    assert!(store.edges().is_empty());
    assert_eq!(order(&store), vec!["r-1", "r-2"]);
    assert_eq!(store.get_block("r-1").unwrap().status, BlockStatus::Approved);
    assert!(store.notices().is_empty());
}

#[test]
fn snapshot_survives_json() {
    let mut store = EditorStore::new();
    let a = store.add_block(BlockType::Text, None, titled("A")).unwrap();
    store
        .add_block(BlockType::Reference, Some(&a.id), titled("Refs"))
        .unwrap();
    let digest = store.sequence_digest().unwrap();

    let json = serde_json::to_string(&store.snapshot()).unwrap();
    let snapshot: EditorSnapshot = serde_json::from_str(&json).unwrap();

    let mut restored = EditorStore::new();
    let report = restored.restore(snapshot);
    assert!(report.rejected.is_empty());
    assert_eq!(restored.sequence_digest().unwrap(), digest);
    assert_eq!(order(&restored), order(&store));
}
