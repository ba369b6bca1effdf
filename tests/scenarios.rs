//! End-to-end pagination sessions

use page_weave::document::walk;
use page_weave::pagination::{ContainerState, ContentMargins, Margins};
use page_weave::{
    Block, Document, Editor, LayoutProbe, LayoutSnapshot, Node, OverrideEntry, PageGeometry,
    PageSelector, PaginationOptions, RegionKind, Transaction, ViewUpdate,
};
use std::rc::Rc;

fn tight_options() -> PaginationOptions {
    let mut options = PaginationOptions::default();
    options.geometry = PageGeometry {
        margins: Margins {
            top: 10.0,
            bottom: 10.0,
            left: 50.0,
            right: 50.0,
        },
        content_margins: ContentMargins {
            top: 10.0,
            bottom: 10.0,
        },
        ..PageGeometry::default()
    };
    options
}

fn rendered(pages: usize, gap: f32) -> LayoutSnapshot {
    LayoutSnapshot {
        rendered_page_count: pages,
        content_bottom: Some(3000.0 + gap),
        last_break_bottom: Some(3000.0),
        ..Default::default()
    }
}

fn footer_entry(page: u32, right: &str) -> Node {
    Node::Entry(OverrideEntry::new(
        RegionKind::Footer,
        PageSelector::Page(page),
        vec![Block::empty()],
        vec![Block::paragraph(right)],
    ))
}

fn footer_texts(document: &Document, page: u32) -> Vec<(String, String)> {
    document
        .override_entries()
        .filter(|entry| entry.matches(RegionKind::Footer, PageSelector::Page(page)))
        .map(|entry| (entry.left().plain_text(), entry.right().plain_text()))
        .collect()
}

#[test]
fn test_empty_document_has_one_page() {
    let editor = Editor::new(Document::new(), PaginationOptions::default());
    assert_eq!(editor.page_count(), 1);
    assert_eq!(editor.decorations().breaks().len(), 1);
    assert!(editor.decorations().breaks()[0].is_last());
}

#[test]
fn test_cold_start_then_measured() {
    let layout = LayoutSnapshot {
        scroll_height: 2500.0,
        ..Default::default()
    };
    let mut editor = Editor::with_layout(Document::new(), tight_options(), layout);
    assert_eq!(editor.page_count(), 4);
    // nothing rendered yet, so the view pass asks for another frame
    assert!(editor.has_pending_frame());

    *editor.layout_mut() = rendered(4, -5.0);
    assert!(matches!(editor.view_update(), ViewUpdate::Measured { .. }));
    let overlay = Rc::clone(editor.decorations());

    assert!(editor.tick());
    assert_eq!(editor.page_count(), 4);
    assert!(Rc::ptr_eq(&overlay, editor.decorations()));
    assert!(!editor.tick());
}

#[test]
fn test_tolerance_band_keeps_overlay() {
    let layout = LayoutSnapshot {
        scroll_height: 1500.0,
        ..Default::default()
    };
    let mut editor = Editor::with_layout(Document::new(), tight_options(), layout);
    assert_eq!(editor.page_count(), 2);
    *editor.layout_mut() = rendered(2, -5.0);
    editor.view_update();
    editor.settle(4);
    let overlay = Rc::clone(editor.decorations());

    editor.insert_block(1, Block::paragraph("typing")).unwrap();
    assert_eq!(editor.page_count(), 2);
    assert!(Rc::ptr_eq(&overlay, editor.decorations()));
}

#[test]
fn test_overflow_adds_page_on_next_frame() {
    let layout = LayoutSnapshot {
        scroll_height: 1500.0,
        ..Default::default()
    };
    let mut editor = Editor::with_layout(Document::new(), tight_options(), layout);
    *editor.layout_mut() = rendered(2, 100.0);

    assert_eq!(editor.view_update(), ViewUpdate::Deferred);
    assert_eq!(editor.page_count(), 2);
    assert!(editor.tick());
    assert_eq!(editor.page_count(), 3);
}

#[test]
fn test_upsert_replaces_entry() {
    let mut editor = Editor::with_text("body", PaginationOptions::default());
    editor
        .set_override_content(RegionKind::Footer, PageSelector::Page(2), "A", "B")
        .unwrap();
    editor
        .set_override_content(RegionKind::Footer, PageSelector::Page(2), "C", "D")
        .unwrap();

    assert_eq!(
        footer_texts(editor.document(), 2),
        vec![("C".to_string(), "D".to_string())]
    );
    assert_eq!(walk::find_containers(editor.document()).len(), 1);
}

#[test]
fn test_most_populated_container_survives_paste() {
    let doc = Document::from_nodes(vec![
        Node::Container {
            children: vec![footer_entry(9, "x")],
        },
        Node::Leaf(Block::paragraph("body")),
    ]);
    let mut editor = Editor::new(doc, PaginationOptions::default());

    let mut tr = editor.transaction();
    tr.insert(
        2,
        Node::Container {
            children: vec![footer_entry(1, "a"), footer_entry(2, "b"), footer_entry(3, "c")],
        },
    )
    .unwrap();
    editor.dispatch(tr);

    let containers = walk::find_containers(editor.document());
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].index, 0);
    assert_eq!(containers[0].node.child_count(), 3);
    assert_eq!(editor.document().text(), "body");
}

#[test]
fn test_loaded_misplaced_container_is_normalized() {
    let source = Document::from_nodes(vec![
        Node::Leaf(Block::paragraph("body")),
        Node::Container {
            children: vec![footer_entry(1, "a"), footer_entry(2, "b"), footer_entry(3, "c")],
        },
    ]);
    let json = source.to_json().unwrap();
    let mut editor = Editor::new(Document::from_json(&json).unwrap(), PaginationOptions::default());

    assert_eq!(
        ContainerState::of(editor.document()),
        ContainerState::SingleCanonicalContainer
    );
    assert!(!editor.undo_manager().can_undo());

    editor
        .set_override_content(RegionKind::Footer, PageSelector::Page(5), "", "NEW")
        .unwrap();
    assert_eq!(editor.document().override_entries().count(), 4);
    assert_eq!(
        footer_texts(editor.document(), 5),
        vec![(String::new(), "NEW".to_string())]
    );
    assert_eq!(editor.document().text(), "body");
}

#[test]
fn test_deleting_container_is_repaired() {
    let mut editor = Editor::with_text("body", PaginationOptions::default());
    editor
        .set_override_content(RegionKind::Header, PageSelector::AllPages, "Title", "")
        .unwrap();
    editor.delete_range(0..1).unwrap();

    assert!(editor.document().first_child().unwrap().is_container());
    assert_eq!(editor.document().override_entries().count(), 1);
}

#[test]
fn test_undo_keeps_container() {
    let mut editor = Editor::with_text("body", PaginationOptions::default());
    editor
        .set_override_content(RegionKind::Footer, PageSelector::Page(1), "", "first")
        .unwrap();
    assert!(editor.undo());
    assert!(editor.document().first_child().unwrap().is_container());
}

#[test]
fn test_undo_restores_previous_override() {
    let mut editor = Editor::with_text("body", PaginationOptions::default());
    editor
        .set_override_content(RegionKind::Footer, PageSelector::Page(2), "A", "B")
        .unwrap();
    editor
        .set_override_content(RegionKind::Footer, PageSelector::Page(2), "C", "D")
        .unwrap();

    assert!(editor.undo());
    assert_eq!(
        footer_texts(editor.document(), 2),
        vec![("A".to_string(), "B".to_string())]
    );
    assert!(editor.redo());
    assert_eq!(
        footer_texts(editor.document(), 2),
        vec![("C".to_string(), "D".to_string())]
    );
}

#[test]
fn test_document_round_trip_keeps_overrides() {
    let mut editor = Editor::with_text("body", PaginationOptions::default());
    editor
        .set_override_content(RegionKind::Footer, PageSelector::Page(3), "", "<p>Appendix</p>")
        .unwrap();
    let json = editor.document().to_json().unwrap();

    let reloaded = Editor::new(Document::from_json(&json).unwrap(), PaginationOptions::default());
    assert_eq!(reloaded.document(), editor.document());
    assert_eq!(
        footer_texts(reloaded.document(), 3),
        vec![(String::new(), "Appendix".to_string())]
    );
}

#[test]
fn test_headless_layout_settles() {
    let text = (0..200)
        .map(|i| format!("Paragraph {} of the settling test.", i))
        .collect::<Vec<_>>()
        .join("\n");
    let mut editor = Editor::with_text(&text, PaginationOptions::default());
    editor.settle(16);

    assert!(!editor.has_pending_frame());
    assert!(editor.page_count() > 1);
    assert_eq!(editor.layout().rendered_page_count(), editor.page_count());
}

#[test]
fn test_metadata_transaction_skips_history() {
    let mut editor = Editor::with_text("body", PaginationOptions::default());
    let tr = Transaction::new(editor.document()).without_history();
    editor.dispatch(tr);
    assert!(editor.update_page_height(900.0));
    assert!(!editor.undo_manager().can_undo());
}
