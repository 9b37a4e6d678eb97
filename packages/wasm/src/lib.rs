//! Browser bindings for the builder. Everything crosses the boundary as JSON
//! strings; store notifications queue up until the UI calls `drainEvents`.

use pagecraft_blocks::{BlockId, PageDocument, Registry};
use pagecraft_editor::{
    BuilderStore, DragCoordinator, DragSource, DropOutcome, EditOp, HoverTarget, Panel,
    StoreEvent,
};
use pagecraft_renderer::{html, HtmlOptions, RawMarkupPolicy, Renderer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error(format!("Invalid {}: {}", what, e)))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error(format!("Serialization error: {}", e)))
}

fn raw_markup_policy(name: &str) -> Result<RawMarkupPolicy, JsValue> {
    match name {
        "verbatim" => Ok(RawMarkupPolicy::Verbatim),
        "escape" => Ok(RawMarkupPolicy::Escape),
        "omit" => Ok(RawMarkupPolicy::Omit),
        other => Err(js_error(format!(
            "Unknown raw markup policy: {}. Use: verbatim, escape or omit",
            other
        ))),
    }
}

/// Block palette grouped by category, as JSON
#[wasm_bindgen(js_name = palette)]
pub fn palette_js() -> Result<String, JsValue> {
    to_json(&Registry::shared().list_by_category())
}

/// One builder session over one page
#[wasm_bindgen]
pub struct BuilderHandle {
    store: BuilderStore,
    drag: DragCoordinator,
    events: Rc<RefCell<Vec<StoreEvent>>>,
}

#[wasm_bindgen]
impl BuilderHandle {
    /// Open a page document (JSON) for editing
    #[wasm_bindgen(constructor)]
    pub fn new(document_json: &str) -> Result<BuilderHandle, JsValue> {
        let document: PageDocument = from_json(document_json, "page document")?;
        let mut store = BuilderStore::new(document, Registry::builtin()).map_err(js_error)?;
        let events = Rc::new(RefCell::new(Vec::new()));
        let queue = events.clone();
        store.subscribe(move |_, event| queue.borrow_mut().push(event.clone()));

        Ok(Self {
            store,
            drag: DragCoordinator::new(),
            events,
        })
    }

    /// Apply one edit operation (JSON)
    pub fn apply(&mut self, op_json: &str) -> Result<(), JsValue> {
        let op: EditOp = from_json(op_json, "edit operation")?;
        self.store.apply(op).map_err(js_error)
    }

    #[wasm_bindgen(js_name = beginBatch)]
    pub fn begin_batch(&mut self) {
        self.store.begin_batch();
    }

    #[wasm_bindgen(js_name = endBatch)]
    pub fn end_batch(&mut self, label: Option<String>) {
        self.store.end_batch(label.as_deref());
    }

    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.store.undo().map_err(js_error)
    }

    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.store.redo().map_err(js_error)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Select a block by id, or clear the selection
    pub fn select(&mut self, block_id: Option<String>) -> Result<(), JsValue> {
        self.store.select(block_id.map(BlockId::new)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = selectedBlockId)]
    pub fn selected_block_id(&self) -> Option<String> {
        self.store
            .selected_block_id()
            .map(|id| id.as_str().to_string())
    }

    #[wasm_bindgen(js_name = setActivePanel)]
    pub fn set_active_panel(&mut self, panel: Option<String>) -> Result<(), JsValue> {
        let panel = match panel {
            Some(name) => Some(
                serde_json::from_value::<Panel>(serde_json::Value::String(name))
                    .map_err(|e| js_error(format!("Invalid panel: {}", e)))?,
            ),
            None => None,
        };
        self.store.set_active_panel(panel);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> f64 {
        self.store.version() as f64
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    /// Current working document as JSON
    #[wasm_bindgen(js_name = documentJson)]
    pub fn document_json(&self) -> Result<String, JsValue> {
        to_json(self.store.document())
    }

    /// `{ key, version, document }` to hand to the save endpoint. `key` stays
    /// the same while the slug of an unsaved page is edited.
    #[wasm_bindgen(js_name = snapshotForSave)]
    pub fn snapshot_for_save(&self) -> Result<String, JsValue> {
        let (version, document) = self.store.snapshot_for_save();
        to_json(&json!({
            "key": self.store.save_key(),
            "version": version,
            "document": document
        }))
    }

    #[wasm_bindgen(js_name = acknowledgeSave)]
    pub fn acknowledge_save(&mut self, version: f64, saved_json: &str) -> Result<(), JsValue> {
        let saved: PageDocument = from_json(saved_json, "saved page")?;
        self.store.acknowledge_save(version as u64, &saved);
        Ok(())
    }

    /// Render the working document for the canvas preview
    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self, raw_markup: &str) -> Result<String, JsValue> {
        let options = HtmlOptions::new(raw_markup_policy(raw_markup)?).compact();
        let renderer = Renderer::with_defaults(self.store.registry());
        let page = renderer.render_page(self.store.document());
        Ok(html::fragment(&page.nodes, &options))
    }

    /// Store events since the last call, oldest first, as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<String, JsValue> {
        let events: Vec<StoreEvent> = self.events.borrow_mut().drain(..).collect();
        to_json(&events)
    }

    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, source_json: &str) -> Result<(), JsValue> {
        let source: DragSource = from_json(source_json, "drag source")?;
        self.drag
            .start(source, self.store.document())
            .map_err(js_error)
    }

    /// Report what the pointer is over; returns the drop target as JSON
    /// (`null` when the position is not a valid drop)
    #[wasm_bindgen(js_name = dragOver)]
    pub fn drag_over(&mut self, hover_json: &str) -> Result<String, JsValue> {
        let hover: HoverTarget = from_json(hover_json, "hover target")?;
        let target = self
            .drag
            .over(self.store.document(), &hover)
            .map_err(js_error)?;
        to_json(&target)
    }

    /// Finish the gesture. Returns `{ "outcome": "applied" | "cancelled" |
    /// "unchanged" }`, with the applied `op` when there is one.
    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) -> Result<String, JsValue> {
        let outcome = self.drag.end(&mut self.store).map_err(js_error)?;
        let summary = match outcome {
            DropOutcome::Applied(op) => json!({ "outcome": "applied", "op": op }),
            DropOutcome::Cancelled => json!({ "outcome": "cancelled" }),
            DropOutcome::Unchanged => json!({ "outcome": "unchanged" }),
        };
        to_json(&summary)
    }

    #[wasm_bindgen(js_name = dragCancel)]
    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const PAGE: &str = r#"{
        "id": "",
        "slug": "about",
        "title": "About",
        "status": "draft",
        "sections": []
    }"#;

    fn events(handle: &BuilderHandle) -> Vec<Value> {
        serde_json::from_str(&handle.drain_events().unwrap()).unwrap()
    }

    #[test]
    fn test_snapshot_key_survives_slug_edit() {
        let mut handle = BuilderHandle::new(PAGE).unwrap();
        let before: Value = serde_json::from_str(&handle.snapshot_for_save().unwrap()).unwrap();
        handle
            .apply(r#"{ "op": "updatePageSettings", "slug": "about-us" }"#)
            .unwrap();
        let after: Value = serde_json::from_str(&handle.snapshot_for_save().unwrap()).unwrap();

        assert!(before["key"].as_str().unwrap().starts_with("session:"));
        assert_eq!(after["key"], before["key"]);
        assert_eq!(after["document"]["slug"], "about-us");
    }

    #[test]
    fn test_apply_queues_events() {
        let mut handle = BuilderHandle::new(PAGE).unwrap();
        handle
            .apply(r#"{ "op": "insertBlock", "blockType": "heading", "index": 0 }"#)
            .unwrap();

        let drained = events(&handle);
        assert_eq!(drained[0]["type"], "documentChanged");
        assert_eq!(drained[1]["type"], "selectionChanged");
        assert!(events(&handle).is_empty());

        assert!(handle.selected_block_id().is_some());
        assert!(handle.is_dirty());
        assert!(handle.render_html("escape").unwrap().contains("pc-heading"));
    }

    #[test]
    fn test_undo_redo() {
        let mut handle = BuilderHandle::new(PAGE).unwrap();
        let before = handle.document_json().unwrap();
        handle
            .apply(r#"{ "op": "insertBlock", "blockType": "text", "index": 0 }"#)
            .unwrap();

        assert!(handle.undo().unwrap());
        assert_eq!(handle.document_json().unwrap(), before);
        assert!(handle.can_redo());
        assert!(handle.redo().unwrap());
        assert!(!handle.can_redo());
    }

    #[test]
    fn test_palette_drag_into_empty_canvas() {
        let mut handle = BuilderHandle::new(PAGE).unwrap();
        handle
            .drag_start(r#"{ "kind": "palette", "value": "hero" }"#)
            .unwrap();
        let target: Value =
            serde_json::from_str(&handle.drag_over(r#"{ "kind": "container" }"#).unwrap())
                .unwrap();
        assert_eq!(target["index"], 0);

        let outcome: Value = serde_json::from_str(&handle.drag_end().unwrap()).unwrap();
        assert_eq!(outcome["outcome"], "applied");
        assert_eq!(outcome["op"]["op"], "insertBlock");

        let document: Value = serde_json::from_str(&handle.document_json().unwrap()).unwrap();
        assert_eq!(document["sections"][0]["type"], "hero");
    }

    #[test]
    fn test_palette_json() {
        let palette: Value = serde_json::from_str(&palette_js().unwrap()).unwrap();
        assert!(palette["layout"].is_array());
        assert!(palette["advanced"].is_array());
    }
}
