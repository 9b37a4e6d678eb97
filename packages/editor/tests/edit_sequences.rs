//! Edit sequences through the store
//!
//! This tests:
//! - Id uniqueness across insert/remove/move/duplicate chains
//! - Atomicity of rejected edits
//! - Undo/redo sequences and batches
//! - Registry subsets

use pagecraft_blocks::{BlockId, BlockType, PageDocument, PropertyMap, Registry, Slug};
use pagecraft_editor::{BuilderStore, EditError, EditOp};
use pagecraft_renderer::Renderer;
use serde_json::json;

fn blank() -> PageDocument {
    PageDocument::blank(Slug::parse("home").unwrap(), "Home")
}

fn insert(block_type: BlockType, index: usize, parent_id: Option<&BlockId>) -> EditOp {
    EditOp::InsertBlock {
        block_type,
        index,
        parent_id: parent_id.cloned(),
    }
}

fn top_level(store: &BuilderStore) -> Vec<BlockType> {
    store
        .document()
        .sections
        .iter()
        .map(|b| b.block_type())
        .collect()
}

/// Every block id is unique and every block sits at the index it is found at
fn assert_consistent(doc: &PageDocument) {
    assert!(doc.validate_ids().is_ok(), "duplicate ids in {:?}", doc.block_ids());
    for id in doc.block_ids() {
        let location = doc.locate(&id).unwrap();
        let list = doc.list(location.parent_id.as_ref()).unwrap();
        assert_eq!(list[location.index].id(), &id);
    }
}

#[test]
fn test_ids_stay_unique_over_edit_chains() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();

    store.apply(insert(BlockType::Section, 0, None)).unwrap();
    let section = store.selected_block_id().cloned().unwrap();
    for i in 0..4 {
        store.apply(insert(BlockType::Text, i, Some(&section))).unwrap();
        assert_consistent(store.document());
    }

    store.apply(EditOp::DuplicateBlock { id: section.clone() }).unwrap();
    assert_consistent(store.document());
    assert_eq!(store.document().block_count(), 10);

    let first_text = store.document().sections[0].children()[0].id().clone();
    store
        .apply(EditOp::MoveBlock {
            id: first_text.clone(),
            to_parent_id: None,
            to_index: 99,
        })
        .unwrap();
    assert_consistent(store.document());
    assert_eq!(store.document().sections.last().unwrap().id(), &first_text);

    store.apply(EditOp::RemoveBlock { id: section }).unwrap();
    assert_consistent(store.document());

    // Fresh ids never reuse ones still in the document
    for _ in 0..5 {
        store.apply(insert(BlockType::Spacer, 0, None)).unwrap();
        assert_consistent(store.document());
    }

    // Undo everything; every intermediate state is consistent too
    while store.undo().unwrap() {
        assert_consistent(store.document());
    }
    assert!(store.document().sections.is_empty());
}

#[test]
fn test_cyclic_move_leaves_document_identical() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();
    store.apply(insert(BlockType::Section, 0, None)).unwrap();
    let outer = store.selected_block_id().cloned().unwrap();
    store.apply(insert(BlockType::Columns, 0, Some(&outer))).unwrap();
    let inner = store.selected_block_id().cloned().unwrap();

    let before = store.document().clone();
    let version = store.version();

    let err = store
        .apply(EditOp::MoveBlock {
            id: outer.clone(),
            to_parent_id: Some(inner.clone()),
            to_index: 0,
        })
        .unwrap_err();

    assert_eq!(
        err,
        EditError::CyclicMove {
            id: outer,
            target: inner
        }
    );
    assert_eq!(store.document(), &before);
    assert_eq!(store.version(), version);
}

#[test]
fn test_undo_restores_exact_prior_document() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();
    store.apply(insert(BlockType::Section, 0, None)).unwrap();
    let section = store.selected_block_id().cloned().unwrap();
    store.apply(insert(BlockType::Heading, 0, Some(&section))).unwrap();
    let heading = store.selected_block_id().cloned().unwrap();
    store.apply(insert(BlockType::Hero, 1, None)).unwrap();

    let mut patch = PropertyMap::new();
    patch.insert("text".to_string(), json!("Welcome"));

    let ops = vec![
        insert(BlockType::Faq, 1, None),
        EditOp::RemoveBlock { id: section.clone() },
        EditOp::MoveBlock {
            id: heading.clone(),
            to_parent_id: None,
            to_index: 0,
        },
        EditOp::UpdateProperties {
            id: heading.clone(),
            patch,
        },
        EditOp::DuplicateBlock { id: section },
    ];

    for op in ops {
        let before = store.document().clone();
        store.apply(op.clone()).unwrap();
        assert_ne!(store.document(), &before, "{} changed nothing", op.name());

        assert!(store.undo().unwrap());
        assert_eq!(store.document(), &before, "undo of {}", op.name());
    }
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();
    let before = store.document().clone();

    assert_eq!(store.undo(), Ok(false));
    assert_eq!(store.redo(), Ok(false));
    assert_eq!(store.document(), &before);
    assert_eq!(store.version(), 0);
}

#[test]
fn test_multiple_updates_with_undo_redo() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();
    store.apply(insert(BlockType::Text, 0, None)).unwrap();
    let text = store.selected_block_id().cloned().unwrap();

    for i in 1..=5 {
        let mut patch = PropertyMap::new();
        patch.insert("content".to_string(), json!(format!("v{}", i)));
        store
            .apply(EditOp::UpdateProperties {
                id: text.clone(),
                patch,
            })
            .unwrap();
    }
    assert_eq!(store.state().history.undo_levels(), 6);

    for _ in 0..5 {
        assert!(store.undo().unwrap());
    }
    assert_eq!(store.state().history.redo_levels(), 5);

    for _ in 0..5 {
        assert!(store.redo().unwrap());
    }
    let content = &store.document().find_block(&text).unwrap().properties["content"];
    assert_eq!(content, &json!("v5"));

    // Undo 3, apply new (clears redo)
    for _ in 0..3 {
        store.undo().unwrap();
    }
    assert_eq!(store.state().history.redo_levels(), 3);
    store.apply(insert(BlockType::Divider, 1, None)).unwrap();
    assert!(!store.can_redo());
}

#[test]
fn test_registry_subset_controls_inserts() {
    let registry = Registry::with_types(&[BlockType::Hero, BlockType::Columns]).unwrap();
    let mut store = BuilderStore::new(blank(), registry).unwrap();

    store.apply(insert(BlockType::Hero, 0, None)).unwrap();
    store.apply(insert(BlockType::Columns, 0, None)).unwrap();
    assert_eq!(top_level(&store), vec![BlockType::Columns, BlockType::Hero]);

    let err = store.apply(insert(BlockType::Faq, 0, None)).unwrap_err();
    assert_eq!(err, EditError::UnknownBlockType("faq".to_string()));
    assert_eq!(store.document().sections.len(), 2);
}

#[test]
fn test_invalid_patch_names_the_key() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();
    store.apply(insert(BlockType::Button, 0, None)).unwrap();
    let button = store.selected_block_id().cloned().unwrap();
    let before = store.document().clone();

    let mut patch = PropertyMap::new();
    patch.insert("label".to_string(), json!("Buy"));
    patch.insert("url".to_string(), json!("javascript:alert(1)"));

    match store.apply(EditOp::UpdateProperties { id: button, patch }) {
        Err(EditError::InvalidProperty { key, .. }) => assert_eq!(key, "url"),
        other => panic!("Expected InvalidProperty, got {:?}", other),
    }
    assert_eq!(store.document(), &before);
}

#[test]
fn test_batch_undoes_as_one_step() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();

    store.begin_batch();
    store.apply(insert(BlockType::Hero, 0, None)).unwrap();
    store.apply(insert(BlockType::Features, 1, None)).unwrap();
    store.apply(insert(BlockType::CallToAction, 2, None)).unwrap();
    store.end_batch(Some("landing template"));

    assert_eq!(store.state().history.undo_levels(), 1);
    assert_eq!(store.state().history.undo_description(), Some("landing template"));

    store.undo().unwrap();
    assert!(store.document().sections.is_empty());
    store.redo().unwrap();
    assert_eq!(store.document().sections.len(), 3);
}

#[test]
fn test_history_limit_is_respected() {
    let mut store = BuilderStore::with_history_limit(blank(), Registry::builtin(), 3).unwrap();
    for i in 0..5 {
        store.apply(insert(BlockType::Spacer, i, None)).unwrap();
    }

    let mut undone = 0;
    while store.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(store.document().sections.len(), 2);
}

#[test]
fn test_rendering_edited_document_is_stable() {
    let mut store = BuilderStore::new(blank(), Registry::builtin()).unwrap();
    store.apply(insert(BlockType::Section, 0, None)).unwrap();
    let section = store.selected_block_id().cloned().unwrap();
    store.apply(insert(BlockType::Pricing, 0, Some(&section))).unwrap();
    store.apply(insert(BlockType::Form, 1, None)).unwrap();

    let renderer = Renderer::with_defaults(store.registry());
    let first = renderer.render_page(store.document());
    let second = renderer.render_page(store.document());
    assert_eq!(first, second);
    assert_eq!(first.nodes.len(), 2);
}
