use pagecraft_blocks::{BlockType, PageDocument, Registry, Slug, MAX_NESTING_DEPTH};
use pagecraft_editor::{BuilderStore, EditError, EditOp};
use pagecraft_gateway::{FileGateway, PageGateway, SaveCoordinator};
use std::sync::Arc;
use tempfile::TempDir;

/// Store holding sections nested `MAX_NESTING_DEPTH` deep
fn deepest_store() -> BuilderStore {
    let page = PageDocument::blank(Slug::parse("deep").unwrap(), "Deep");
    let mut store = BuilderStore::new(page, Registry::builtin()).unwrap();

    let mut parent = None;
    for _ in 0..MAX_NESTING_DEPTH {
        store
            .apply(EditOp::InsertBlock {
                block_type: BlockType::Section,
                index: 0,
                parent_id: parent,
            })
            .unwrap();
        parent = store.selected_block_id().cloned();
    }
    store
}

#[tokio::test]
async fn test_deepest_allowed_page_reloads() {
    let dir = TempDir::new().unwrap();
    let mut store = deepest_store();
    assert_eq!(store.document().depth(), MAX_NESTING_DEPTH);

    let saved = {
        let gateway = Arc::new(FileGateway::open(dir.path()).await.unwrap());
        let coordinator = SaveCoordinator::new(gateway);
        let (version, snapshot) = store.snapshot_for_save();
        let saved = coordinator.save(store.save_key(), snapshot).await.unwrap();
        store.acknowledge_save(version, &saved);
        saved
    };

    let gateway = FileGateway::open(dir.path()).await.unwrap();
    let reloaded = gateway.get_page(&saved.id).await.unwrap();
    assert_eq!(reloaded, saved);
    assert_eq!(reloaded.sections, store.document().sections);

    // The reloaded page opens in a new builder session
    assert!(BuilderStore::new(reloaded, Registry::builtin()).is_ok());
}

#[test]
fn test_nesting_past_the_limit_is_refused() {
    let mut store = deepest_store();
    let deepest = store.selected_block_id().cloned();
    let version = store.version();

    assert_eq!(
        store.apply(EditOp::InsertBlock {
            block_type: BlockType::Divider,
            index: 0,
            parent_id: deepest,
        }),
        Err(EditError::NestingTooDeep {
            depth: MAX_NESTING_DEPTH + 1,
            max: MAX_NESTING_DEPTH
        })
    );
    assert_eq!(store.version(), version);
    assert_eq!(store.document().depth(), MAX_NESTING_DEPTH);
}
