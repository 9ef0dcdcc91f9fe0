//! Integration tests for drag-and-drop moves through a live session.

mod helpers;

use deskfs_entity::id::ItemId;
use deskfs_entity::item::{Item, ItemKind};
use deskfs_service::{DragEffect, DragEvent, DragState, HitTester, Point, PointerKind, Rect};

use helpers::TestSession;

/// The shown items laid out left to right in 100x100 cells.
struct Row {
    items: Vec<Item>,
}

impl Row {
    async fn of(t: &TestSession) -> Self {
        Self {
            items: t.session.explorer().items().await,
        }
    }

    fn center(&self, id: &ItemId) -> Point {
        let index = self.items.iter().position(|item| &item.id == id).unwrap();
        Point::new(index as f64 * 100.0 + 50.0, 50.0)
    }

    fn cell(index: usize) -> Rect {
        Rect {
            left: index as f64 * 100.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

impl HitTester for Row {
    fn folder_at(&self, point: Point) -> Option<ItemId> {
        if !(0.0..100.0).contains(&point.y) || point.x < 0.0 {
            return None;
        }
        let item = self.items.get((point.x / 100.0) as usize)?;
        item.is_folder().then(|| item.id.clone())
    }

    fn items_in_rect(&self, rect: Rect) -> Vec<ItemId> {
        self.items
            .iter()
            .enumerate()
            .filter(|(i, _)| Row::cell(*i).intersects(&rect))
            .map(|(_, item)| item.id.clone())
            .collect()
    }
}

fn press(item: &ItemId, at: Point) -> DragEvent {
    DragEvent::PointerDown {
        item: Some(item.clone()),
        at,
        kind: PointerKind::Mouse,
    }
}

async fn desktop() -> (TestSession, ItemId, ItemId, ItemId) {
    let t = TestSession::open().await;
    let a = ItemId::from("note-a");
    let b = ItemId::from("note-b");
    t.remote
        .insert(&ItemId::root(), Item::new(a.clone(), ItemKind::Note, "a"))
        .await;
    t.remote
        .insert(&ItemId::root(), Item::new(b.clone(), ItemKind::Note, "b"))
        .await;
    let target = t.remote.insert_folder(&ItemId::root(), "Target").await;
    t.at_root().await;
    (t, a, b, target)
}

#[tokio::test]
async fn test_drop_moves_whole_selection() {
    let (t, a, b, target) = desktop().await;
    let row = Row::of(&t).await;
    let mut machine = t.session.drag_machine();
    machine.set_selection([a.clone(), b.clone()]);

    machine.handle(press(&a, row.center(&a)), &row);
    machine.handle(DragEvent::PointerMove { at: row.center(&target) }, &row);
    let effects = machine.handle(DragEvent::PointerUp { at: row.center(&target) }, &row);
    assert_eq!(machine.state(), &DragState::Idle);

    let Some(DragEffect::Drop { ids, target: into }) = effects
        .into_iter()
        .find(|effect| matches!(effect, DragEffect::Drop { .. }))
    else {
        panic!("expected a drop");
    };
    assert_eq!(ids, vec![a.clone(), b.clone()]);
    assert_eq!(into, target);

    t.session.coordinator().move_items(&ids, &into).await.unwrap();
    assert_eq!(t.remote.parent_of(&a).await, Some(target.clone()));
    assert_eq!(t.remote.parent_of(&b).await, Some(target.clone()));
    assert_eq!(t.shown_names().await, vec!["System", "Target"]);
}

#[tokio::test]
async fn test_system_folder_is_never_a_drop_target() {
    let (t, a, _, _) = desktop().await;
    let system = t.session.bootstrap().system_folder_id.clone();
    let row = Row::of(&t).await;
    let mut machine = t.session.drag_machine();

    machine.handle(press(&a, row.center(&a)), &row);
    let effects = machine.handle(DragEvent::PointerMove { at: row.center(&system) }, &row);
    assert!(!effects.contains(&DragEffect::HighlightTarget(Some(system.clone()))));

    let effects = machine.handle(DragEvent::PointerUp { at: row.center(&system) }, &row);
    assert!(effects.contains(&DragEffect::Cancelled));
    assert_eq!(t.remote.parent_of(&a).await, Some(ItemId::root()));
}

#[tokio::test]
async fn test_dragged_folder_is_not_its_own_target() {
    let (t, _, _, target) = desktop().await;
    let row = Row::of(&t).await;
    let mut machine = t.session.drag_machine();

    let start = row.center(&target);
    machine.handle(press(&target, start), &row);
    let effects = machine.handle(
        DragEvent::PointerMove {
            at: Point::new(start.x + 20.0, start.y),
        },
        &row,
    );
    assert!(effects.contains(&DragEffect::DragStarted(vec![target.clone()])));
    assert!(!effects.iter().any(|e| matches!(e, DragEffect::HighlightTarget(Some(_)))));

    let effects = machine.handle(
        DragEvent::PointerUp {
            at: Point::new(start.x + 20.0, start.y),
        },
        &row,
    );
    assert!(effects.contains(&DragEffect::Cancelled));
}

#[tokio::test]
async fn test_marquee_selects_covered_items() {
    let (t, a, b, _) = desktop().await;
    let row = Row::of(&t).await;
    let mut machine = t.session.drag_machine();

    let origin = Point::new(row.center(&a).x, 300.0);
    machine.handle(
        DragEvent::PointerDown {
            item: None,
            at: origin,
            kind: PointerKind::Mouse,
        },
        &row,
    );
    let effects = machine.handle(
        DragEvent::PointerMove {
            at: row.center(&b),
        },
        &row,
    );
    assert!(effects.contains(&DragEffect::SelectionChanged(vec![a.clone(), b.clone()])));
    machine.handle(DragEvent::PointerUp { at: row.center(&b) }, &row);
    assert_eq!(machine.selection(), vec![a, b]);
}
