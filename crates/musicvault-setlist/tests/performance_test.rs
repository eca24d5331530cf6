//! Performance mode over a setlist loaded from the store.

use musicvault_core::gateway::{MemoryGateway, Table};
use musicvault_core::model::{to_record, NewBandish, NewKaryakram, NewRaga};
use musicvault_core::Gateway;
use musicvault_setlist::{Composition, PerformanceNavigator, Setlist, SetlistEditor, Upcoming};
use std::sync::Arc;

async fn programme(gateway: &Arc<MemoryGateway>, titles: &[&str]) -> SetlistEditor {
    let raga = gateway
        .insert(Table::Ragas, to_record(&NewRaga::new("Bageshree")).unwrap())
        .await
        .unwrap();
    let event = gateway
        .insert(Table::Karyakrams, to_record(&NewKaryakram::new("Sandhya")).unwrap())
        .await
        .unwrap();
    let mut editor = SetlistEditor::open(gateway.clone(), event.as_str().parse().unwrap())
        .await
        .unwrap();

    for title in titles {
        let bandish = NewBandish::new(*title).in_raga(raga.as_str().parse().unwrap());
        let id = gateway
            .insert(Table::Bandishes, to_record(&bandish).unwrap())
            .await
            .unwrap();
        let bandish = musicvault_core::model::from_record(
            gateway.get_one(Table::Bandishes, &id).await.unwrap(),
        )
        .unwrap();
        editor
            .append(Composition::from_bandish(bandish, None))
            .await
            .unwrap();
    }
    editor
}

#[tokio::test]
async fn test_walk_through_a_set() {
    let gateway = Arc::new(MemoryGateway::new());
    let editor = programme(&gateway, &["Alap", "Vilambit", "Drut", "Tarana"]).await;
    let mut nav = PerformanceNavigator::new(editor.setlist());

    assert_eq!(nav.progress().to_string(), "1 / 4");
    let current = nav.current().unwrap();
    assert_eq!(current.title(), "Alap");
    // Raga names are joined on load.
    assert_eq!(
        current.composition.as_ref().unwrap().raga_name.as_deref(),
        Some("Bageshree")
    );

    for _ in 0..4 {
        nav.advance();
    }
    assert_eq!(nav.cursor(), Some(3));
    assert_eq!(nav.current().unwrap().title(), "Tarana");
    assert_eq!(nav.upcoming(), Upcoming::EndOfSet);
    assert_eq!(nav.progress().to_string(), "4 / 4");

    nav.retreat();
    match nav.upcoming() {
        Upcoming::Next(item) => assert_eq!(item.title(), "Tarana"),
        Upcoming::EndOfSet => panic!("expected a next item"),
    }
}

#[tokio::test]
async fn test_edits_after_snapshot_do_not_move_the_navigator() {
    let gateway = Arc::new(MemoryGateway::new());
    let mut editor = programme(&gateway, &["Alap", "Drut"]).await;
    let mut nav = PerformanceNavigator::new(editor.setlist());
    nav.advance();

    let first = editor.setlist().items()[0].id;
    editor.remove(first).await.unwrap();
    assert_eq!(nav.len(), 2);
    assert_eq!(nav.current().unwrap().title(), "Drut");

    // Reloading the same event keeps the cursor, clamped.
    let reloaded = Setlist::load(&*gateway, editor.setlist().event_id()).await.unwrap();
    nav.load(&reloaded);
    assert_eq!(nav.cursor(), Some(0));
    assert_eq!(nav.current().unwrap().title(), "Drut");
}

#[tokio::test]
async fn test_empty_set() {
    let gateway = Arc::new(MemoryGateway::new());
    let editor = programme(&gateway, &[]).await;
    let nav = PerformanceNavigator::new(editor.setlist());
    assert!(nav.current().is_err());
    assert_eq!(nav.progress().to_string(), "0 / 0");
}
