//! Setlist editing against the in-memory and SQLite gateways.

use musicvault_core::gateway::{GatewayOp, MemoryGateway, SqliteGateway, Table};
use musicvault_core::model::{
    from_record, to_record, Bandish, KaryakramId, NewBandish, NewKaryakram, NewKaryakramItem,
};
use musicvault_core::{Gateway, RecordId};
use musicvault_setlist::{
    Composition, Direction, Freshness, ItemIdentity, SetlistEditor, SetlistError, SwapOutcome,
};
use std::sync::Arc;
use tempfile::TempDir;

async fn add_bandish(gateway: &dyn Gateway, title: &str) -> Composition {
    let id = gateway
        .insert(Table::Bandishes, to_record(&NewBandish::new(title)).unwrap())
        .await
        .unwrap();
    let bandish: Bandish = from_record(gateway.get_one(Table::Bandishes, &id).await.unwrap()).unwrap();
    Composition::from_bandish(bandish, None)
}

async fn add_event(gateway: &dyn Gateway) -> KaryakramId {
    let id = gateway
        .insert(Table::Karyakrams, to_record(&NewKaryakram::new("Baithak")).unwrap())
        .await
        .unwrap();
    id.as_str().parse().unwrap()
}

/// An event with items A, B, C at ordinals 1, 2, 3.
async fn abc(gateway: &Arc<MemoryGateway>) -> (SetlistEditor, Vec<Composition>) {
    let event_id = add_event(&**gateway).await;
    let mut compositions = Vec::new();
    for (i, title) in ["A", "B", "C"].into_iter().enumerate() {
        let composition = add_bandish(&**gateway, title).await;
        gateway
            .insert(
                Table::KaryakramItems,
                to_record(&NewKaryakramItem {
                    karyakram_id: event_id,
                    bandish_id: composition.id,
                    sequence_order: i as u32 + 1,
                })
                .unwrap(),
            )
            .await
            .unwrap();
        compositions.push(composition);
    }
    let editor = SetlistEditor::open(gateway.clone(), event_id).await.unwrap();
    gateway.clear_calls().unwrap();
    (editor, compositions)
}

fn titles(editor: &SetlistEditor) -> Vec<String> {
    editor
        .setlist()
        .items()
        .iter()
        .map(|item| item.title().to_string())
        .collect()
}

#[tokio::test]
async fn test_load_orders_by_ordinal_and_joins() {
    let gateway = Arc::new(MemoryGateway::new());
    let (editor, _) = abc(&gateway).await;
    assert_eq!(titles(&editor), vec!["A", "B", "C"]);
    assert_eq!(editor.setlist().ordinals(), vec![1, 2, 3]);
    assert!(editor.setlist().items().iter().all(|i| !i.id.is_pending()));
}

#[tokio::test]
async fn test_load_missing_event_is_not_found() {
    let gateway = Arc::new(MemoryGateway::new());
    let err = SetlistEditor::open(gateway, KaryakramId::new()).await.unwrap_err();
    assert!(matches!(err, SetlistError::NotFound(_)));
}

#[tokio::test]
async fn test_load_empty_setlist() {
    let gateway = Arc::new(MemoryGateway::new());
    let event_id = add_event(&*gateway).await;
    let editor = SetlistEditor::open(gateway, event_id).await.unwrap();
    assert!(editor.setlist().is_empty());
}

#[tokio::test]
async fn test_swap_up_renumbers_whole_list() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;

    let outcome = editor.swap_adjacent(1, Direction::Up).await.unwrap();
    assert_eq!(outcome, SwapOutcome::Moved);
    assert_eq!(titles(&editor), vec!["B", "A", "C"]);
    assert_eq!(editor.setlist().ordinals(), vec![1, 2, 3]);
    assert_eq!(gateway.call_count(GatewayOp::Update).unwrap(), 3);

    editor.reload().await.unwrap();
    assert_eq!(titles(&editor), vec!["B", "A", "C"]);
}

#[tokio::test]
async fn test_boundary_swaps_issue_no_store_calls() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;

    assert_eq!(
        editor.swap_adjacent(0, Direction::Up).await.unwrap(),
        SwapOutcome::Unchanged
    );
    assert_eq!(
        editor.swap_adjacent(2, Direction::Down).await.unwrap(),
        SwapOutcome::Unchanged
    );
    assert_eq!(
        editor.swap_adjacent(7, Direction::Up).await.unwrap(),
        SwapOutcome::Unchanged
    );
    assert_eq!(titles(&editor), vec!["A", "B", "C"]);
    assert!(gateway.calls().unwrap().is_empty());
}

#[tokio::test]
async fn test_append_is_visible_before_commit() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;
    let d = add_bandish(&*gateway, "D").await;
    gateway.clear_calls().unwrap();

    let pending = editor.stage_append(d);
    assert_eq!(pending.sequence_ordinal(), 4);
    assert_eq!(titles(&editor), vec!["A", "B", "C", "D"]);
    assert_eq!(editor.setlist().ordinals(), vec![1, 2, 3, 4]);
    assert!(editor.setlist().items()[3].id.is_pending());
    assert_eq!(editor.setlist().items()[3].event_id, editor.setlist().event_id());
    assert!(gateway.calls().unwrap().is_empty());

    editor.commit_append(pending).await.unwrap();
    assert_eq!(titles(&editor), vec!["A", "B", "C", "D"]);
    assert!(editor.setlist().items().iter().all(|i| !i.id.is_pending()));
    assert_eq!(gateway.call_count(GatewayOp::Insert).unwrap(), 1);
}

#[tokio::test]
async fn test_failed_append_leaves_phantom_until_reload() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;
    let d = add_bandish(&*gateway, "D").await;
    gateway.fail_next(GatewayOp::Insert, 1).unwrap();

    let err = editor.append(d).await.unwrap_err();
    assert!(matches!(err, SetlistError::Mutation { operation: "append", .. }));
    assert_eq!(editor.setlist().len(), 4);
    assert!(editor.setlist().is_stale());

    // No automatic retry.
    assert_eq!(gateway.call_count(GatewayOp::Insert).unwrap(), 2);

    editor.reload().await.unwrap();
    assert_eq!(titles(&editor), vec!["A", "B", "C"]);
    assert_eq!(editor.setlist().freshness(), &Freshness::Fresh);
}

#[tokio::test]
async fn test_remove_does_not_renumber() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;
    let b = editor.setlist().items()[1].id;

    let pending = editor.stage_remove(b);
    assert_eq!(titles(&editor), vec!["A", "C"]);
    assert_eq!(editor.setlist().ordinals(), vec![1, 3]);
    assert!(gateway.calls().unwrap().is_empty());

    editor.commit_remove(pending).await.unwrap();
    assert_eq!(gateway.calls().unwrap(), vec![(GatewayOp::Delete, Table::KaryakramItems)]);

    editor.reload().await.unwrap();
    assert_eq!(editor.setlist().ordinals(), vec![1, 3]);
}

#[tokio::test]
async fn test_failed_remove_marks_stale() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;
    let b = editor.setlist().items()[1].id;
    gateway.fail_next(GatewayOp::Delete, 1).unwrap();

    let err = editor.remove(b).await.unwrap_err();
    assert!(matches!(err, SetlistError::Mutation { operation: "remove", .. }));
    assert_eq!(titles(&editor), vec!["A", "C"]);
    assert!(editor.setlist().is_stale());

    editor.reload().await.unwrap();
    assert_eq!(titles(&editor), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_remove_unknown_item_still_sends_delete() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;

    let stranger = ItemIdentity::Durable(musicvault_core::model::KaryakramItemId::new());
    let err = editor.remove(stranger).await.unwrap_err();
    assert!(matches!(err, SetlistError::Mutation { .. }));
    assert_eq!(gateway.call_count(GatewayOp::Delete).unwrap(), 1);
    assert_eq!(editor.setlist().len(), 3);
}

#[tokio::test]
async fn test_removing_placeholder_sends_nothing() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, compositions) = abc(&gateway).await;

    let pending = editor.stage_append(compositions[0].clone());
    let placeholder = pending.placeholder();
    drop(pending);
    editor.remove(placeholder).await.unwrap();

    assert_eq!(editor.setlist().len(), 3);
    assert!(gateway.calls().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_swap_failure() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;
    gateway.fail_next(GatewayOp::Update, 1).unwrap();

    let err = editor.swap_adjacent(0, Direction::Down).await.unwrap_err();
    assert!(matches!(
        err,
        SetlistError::PartialFailure {
            succeeded: 2,
            failed: 1,
            ..
        }
    ));
    // Local order is kept and the remaining updates were still sent.
    assert_eq!(titles(&editor), vec!["B", "A", "C"]);
    assert_eq!(gateway.call_count(GatewayOp::Update).unwrap(), 3);
    assert!(editor.setlist().is_stale());
}

#[tokio::test]
async fn test_total_swap_failure_is_mutation_error() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, _) = abc(&gateway).await;
    gateway.fail_next(GatewayOp::Update, 3).unwrap();

    let err = editor.swap_adjacent(2, Direction::Up).await.unwrap_err();
    assert!(matches!(err, SetlistError::Mutation { operation: "reorder", .. }));
    assert_eq!(titles(&editor), vec!["A", "C", "B"]);
}

#[tokio::test]
async fn test_swap_skips_placeholders() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, compositions) = abc(&gateway).await;
    gateway.fail_next(GatewayOp::Insert, 1).unwrap();
    let _ = editor.append(compositions[1].clone()).await.unwrap_err();
    gateway.clear_calls().unwrap();

    editor.swap_adjacent(3, Direction::Up).await.unwrap();
    assert_eq!(editor.setlist().ordinals(), vec![1, 2, 3, 4]);
    assert_eq!(gateway.call_count(GatewayOp::Update).unwrap(), 3);
}

#[tokio::test]
async fn test_ordinals_are_a_permutation_after_every_swap() {
    let gateway = Arc::new(MemoryGateway::new());
    let event_id = add_event(&*gateway).await;
    let mut editor = SetlistEditor::open(gateway.clone(), event_id).await.unwrap();

    for title in ["A", "B", "C", "D", "E"] {
        let c = add_bandish(&*gateway, title).await;
        editor.append(c).await.unwrap();
    }
    let c = editor.setlist().items()[2].id;
    editor.remove(c).await.unwrap();

    let moves = [
        (3, Direction::Up),
        (0, Direction::Down),
        (2, Direction::Down),
        (1, Direction::Up),
        (3, Direction::Down),
    ];
    for (index, direction) in moves {
        editor.swap_adjacent(index, direction).await.unwrap();
        let n = editor.setlist().len() as u32;
        let mut ordinals = editor.setlist().ordinals();
        ordinals.sort_unstable();
        assert_eq!(ordinals, (1..=n).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_deleted_bandish_renders_missing() {
    let gateway = Arc::new(MemoryGateway::new());
    let (mut editor, compositions) = abc(&gateway).await;

    gateway
        .delete(Table::Bandishes, &RecordId::new(compositions[1].id.to_string()))
        .await
        .unwrap();
    editor.reload().await.unwrap();

    assert_eq!(editor.setlist().len(), 3);
    assert!(editor.setlist().items()[1].composition.is_none());
    assert_eq!(titles(&editor)[1], "(missing bandish)");
}

#[tokio::test]
async fn test_editing_on_disk() {
    let dir = TempDir::new().unwrap();
    let gateway: Arc<dyn Gateway> =
        Arc::new(SqliteGateway::open(dir.path().join("test.db")).unwrap());
    let event_id = add_event(&*gateway).await;

    let mut editor = SetlistEditor::open(Arc::clone(&gateway), event_id).await.unwrap();
    for title in ["Alap", "Vilambit", "Drut"] {
        let c = add_bandish(&*gateway, title).await;
        editor.append(c).await.unwrap();
    }
    editor.swap_adjacent(2, Direction::Up).await.unwrap();
    let first = editor.setlist().items()[0].id;
    editor.remove(first).await.unwrap();

    let reopened = SetlistEditor::open(gateway, event_id).await.unwrap();
    let names: Vec<_> = reopened.setlist().items().iter().map(|i| i.title()).collect();
    assert_eq!(names, vec!["Drut", "Vilambit"]);
    assert_eq!(reopened.setlist().ordinals(), vec![2, 3]);
}
