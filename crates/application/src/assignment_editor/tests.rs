use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use proptest::prelude::*;
use tokio::sync::Mutex;

use iam_graph_core::{AppError, AppResult};
use iam_graph_domain::{
    EntityId, FacultadName, GraphMember, IdRol, MemberKey, NodeId, SubjectGraph,
    SubjectKind, SubjectNode, SubjectRef,
};

use crate::assignment_ports::{
    AssignmentGateway, AssignmentRequest, GraphViewEvent, GraphViewSink, InteractionPhase,
    RenderMode,
};

use super::{AssignmentEditor, DeleteOutcome, DroppedItem, NodeClick};

#[derive(Default)]
struct FakeGateway {
    source: Option<SubjectGraph>,
    stored: Vec<GraphMember>,
    failing: Vec<MemberKey>,
    fetches: Mutex<usize>,
    assigned: Mutex<Vec<AssignmentRequest>>,
    unassigned: Mutex<Vec<AssignmentRequest>>,
}

impl FakeGateway {
    async fn remote_calls(&self) -> usize {
        self.assigned.lock().await.len() + self.unassigned.lock().await.len()
    }
}

#[async_trait]
impl AssignmentGateway for FakeGateway {
    async fn fetch_subject_graph(&self, subject: SubjectRef) -> AppResult<SubjectGraph> {
        *self.fetches.lock().await += 1;
        self.source
            .clone()
            .ok_or_else(|| AppError::NotFound(format!("{subject} does not exist")))
    }

    async fn assign(&self, request: &AssignmentRequest) -> AppResult<GraphMember> {
        self.assigned.lock().await.push(request.clone());
        if self.failing.contains(&request.member) {
            return Err(AppError::Remote("backend refused the assignment".to_owned()));
        }
        self.stored
            .iter()
            .find(|member| member.key == request.member)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("{} does not exist", request.member)))
    }

    async fn unassign(&self, request: &AssignmentRequest) -> AppResult<()> {
        self.unassigned.lock().await.push(request.clone());
        if self.failing.contains(&request.member) {
            return Err(AppError::Remote("backend refused the unassignment".to_owned()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingView {
    events: StdMutex<Vec<GraphViewEvent>>,
}

impl RecordingView {
    fn events(&self) -> Vec<GraphViewEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl GraphViewSink for RecordingView {
    fn publish(&self, event: GraphViewEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

fn entity_id(value: i64) -> EntityId {
    EntityId::new(value).unwrap_or_else(|_| unreachable!())
}

fn facultad_key(name: &str) -> MemberKey {
    MemberKey::Facultad(FacultadName::new(name).unwrap_or_else(|_| unreachable!()))
}

fn facultad(name: &str, backing_id: i64) -> GraphMember {
    GraphMember {
        key: facultad_key(name),
        backing_id: entity_id(backing_id),
        caption: name.to_owned(),
        active: true,
    }
}

fn rol_key(id_rol: i64) -> MemberKey {
    MemberKey::Rol(IdRol::new(id_rol).unwrap_or_else(|_| unreachable!()))
}

fn rol_member(id_rol: i64, caption: &str) -> GraphMember {
    GraphMember {
        key: rol_key(id_rol),
        backing_id: entity_id(id_rol + 100),
        caption: caption.to_owned(),
        active: true,
    }
}

fn stored_members() -> Vec<GraphMember> {
    vec![
        facultad("LECTURA", 11),
        facultad("ESCRITURA", 12),
        rol_member(3, "Cajero"),
    ]
}

fn rol_graph(id: Option<i64>, members: Vec<GraphMember>) -> SubjectGraph {
    SubjectGraph {
        subject: SubjectNode {
            kind: SubjectKind::Rol,
            id: id.map(entity_id),
            caption: "Operador".to_owned(),
            active: true,
        },
        members,
    }
}

fn started(
    source: SubjectGraph,
    failing: Vec<MemberKey>,
) -> (AssignmentEditor, Arc<FakeGateway>, Arc<RecordingView>) {
    let gateway = Arc::new(FakeGateway {
        source: Some(source.clone()),
        stored: stored_members(),
        failing,
        ..FakeGateway::default()
    });
    let view = Arc::new(RecordingView::default());
    let mut editor = AssignmentEditor::new(gateway.clone(), view.clone());
    editor
        .start_graph(source)
        .unwrap_or_else(|_| unreachable!());
    (editor, gateway, view)
}

fn member_captions(editor: &AssignmentEditor) -> Vec<String> {
    editor
        .graph()
        .map(|graph| {
            graph
                .members()
                .iter()
                .map(|member| member.caption.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn click(editor: &AssignmentEditor, slot: usize) -> NodeClick {
    let graph = editor.graph().unwrap_or_else(|| unreachable!());
    NodeClick {
        slot,
        node: graph.node_id_at(slot).unwrap_or_else(|| unreachable!()),
        revision: graph.revision(),
    }
}

#[tokio::test]
async fn dropping_a_facultad_assigns_it_and_rejects_the_duplicate() {
    let (mut editor, gateway, view) = started(rol_graph(Some(5), Vec::new()), Vec::new());

    let committed = editor
        .item_dropped(DroppedItem::Assignment(facultad_key("LECTURA")))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(committed.member, facultad_key("LECTURA"));
    assert_eq!(committed.revision, 1);
    assert_eq!(member_captions(&editor), vec!["LECTURA".to_owned()]);
    assert!(
        view.events()
            .contains(&GraphViewEvent::SaveConfirmed {
                member: facultad_key("LECTURA"),
            })
    );

    let duplicate = editor
        .item_dropped(DroppedItem::Assignment(facultad_key("LECTURA")))
        .await;

    assert!(matches!(duplicate, Err(AppError::Validation(message)) if message.contains("already assigned")));
    assert_eq!(member_captions(&editor), vec!["LECTURA".to_owned()]);
    assert_eq!(gateway.assigned.lock().await.len(), 1);
    assert_eq!(editor.phase(), InteractionPhase::Idle);
}

#[tokio::test]
async fn committed_member_is_taken_from_the_store() {
    let stored = GraphMember {
        active: false,
        ..facultad("LECTURA", 11)
    };
    let gateway = Arc::new(FakeGateway {
        source: Some(rol_graph(Some(5), Vec::new())),
        stored: vec![stored.clone()],
        ..FakeGateway::default()
    });
    let view = Arc::new(RecordingView::default());
    let mut editor = AssignmentEditor::new(gateway, view);
    editor
        .start_graph(rol_graph(Some(5), Vec::new()))
        .unwrap_or_else(|_| unreachable!());

    editor
        .item_dropped(DroppedItem::Assignment(facultad_key("LECTURA")))
        .await
        .unwrap_or_else(|_| unreachable!());

    let graph = editor.graph().unwrap_or_else(|| unreachable!());
    assert_eq!(graph.members(), &[stored]);
    let node = &graph.payload().nodes[1];
    assert_eq!(node.backing_id, Some(entity_id(11)));
    assert!(!node.active);
}

#[tokio::test]
async fn drop_of_a_member_missing_from_the_store_changes_nothing() {
    let (mut editor, gateway, _view) = started(rol_graph(Some(5), Vec::new()), Vec::new());

    let result = editor
        .item_dropped(DroppedItem::Assignment(facultad_key("FANTASMA")))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(gateway.assigned.lock().await.len(), 1);
    assert!(member_captions(&editor).is_empty());
    assert_eq!(editor.graph().map(|graph| graph.revision()), Some(0));
}

#[tokio::test]
async fn deleting_one_selected_facultad_unassigns_only_that_one() {
    let (mut editor, gateway, _view) = started(
        rol_graph(
            Some(5),
            vec![facultad("LECTURA", 11), facultad("ESCRITURA", 12)],
        ),
        Vec::new(),
    );

    let selected = editor
        .toggle_select(click(&editor, 1))
        .unwrap_or_else(|_| unreachable!());
    assert!(selected.is_some());

    let outcome = editor
        .delete_selected()
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(matches!(outcome, DeleteOutcome::Committed { .. }));
    assert_eq!(outcome.removed(), &[facultad_key("LECTURA")]);
    let unassigned = gateway.unassigned.lock().await;
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].member, facultad_key("LECTURA"));
    assert_eq!(member_captions(&editor), vec!["ESCRITURA".to_owned()]);
    assert!(editor.selection().is_empty());
}

#[tokio::test]
async fn partial_unassign_failure_keeps_failed_member_and_clears_selection() {
    let (mut editor, gateway, _view) = started(
        rol_graph(Some(5), vec![facultad("AAAA", 11), facultad("BBBB", 12)]),
        vec![facultad_key("BBBB")],
    );

    editor
        .toggle_select(click(&editor, 1))
        .unwrap_or_else(|_| unreachable!());
    editor
        .toggle_select(click(&editor, 2))
        .unwrap_or_else(|_| unreachable!());

    let outcome = editor
        .delete_selected()
        .await
        .unwrap_or_else(|_| unreachable!());

    match outcome {
        DeleteOutcome::PartialFailure {
            removed, failures, ..
        } => {
            assert_eq!(removed, vec![facultad_key("AAAA")]);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].member, facultad_key("BBBB"));
        }
        DeleteOutcome::Committed { .. } => unreachable!(),
    }
    assert_eq!(gateway.unassigned.lock().await.len(), 2);
    assert_eq!(member_captions(&editor), vec!["BBBB".to_owned()]);
    assert!(editor.selection().is_empty());
    assert_eq!(editor.phase(), InteractionPhase::Idle);
}

#[tokio::test]
async fn unsaved_subject_rejects_drop_without_remote_calls() {
    let (mut editor, gateway, _view) = started(rol_graph(None, Vec::new()), Vec::new());

    let result = editor
        .item_dropped(DroppedItem::Assignment(facultad_key("LECTURA")))
        .await;

    assert!(matches!(result, Err(AppError::Precondition(message)) if message.contains("save it")));
    assert!(member_captions(&editor).is_empty());
    assert_eq!(gateway.remote_calls().await, 0);
    assert_eq!(editor.phase(), InteractionPhase::Idle);
}

#[tokio::test]
async fn failed_assignment_leaves_snapshot_untouched() {
    let (mut editor, gateway, _view) =
        started(rol_graph(Some(5), Vec::new()), vec![facultad_key("LECTURA")]);

    let result = editor
        .item_dropped(DroppedItem::Assignment(facultad_key("LECTURA")))
        .await;

    assert!(matches!(result, Err(AppError::Remote(_))));
    assert_eq!(gateway.assigned.lock().await.len(), 1);
    assert!(member_captions(&editor).is_empty());
    assert_eq!(editor.graph().map(|graph| graph.revision()), Some(0));
    assert_eq!(editor.phase(), InteractionPhase::Idle);
}

#[tokio::test]
async fn unknown_and_foreign_items_are_rejected_locally() {
    let (mut editor, gateway, _view) = started(rol_graph(Some(5), Vec::new()), Vec::new());

    let unknown = editor
        .item_dropped(DroppedItem::Unknown {
            type_name: "usuario".to_owned(),
        })
        .await;
    let foreign = editor
        .item_dropped(DroppedItem::Assignment(rol_key(3)))
        .await;

    assert!(matches!(unknown, Err(AppError::Validation(_))));
    assert!(matches!(foreign, Err(AppError::Validation(_))));
    assert_eq!(gateway.remote_calls().await, 0);
}

#[tokio::test]
async fn perfil_subject_accepts_rol_members() {
    let source = SubjectGraph {
        subject: SubjectNode {
            kind: SubjectKind::Perfil,
            id: Some(entity_id(8)),
            caption: "Cajas".to_owned(),
            active: true,
        },
        members: Vec::new(),
    };
    let (mut editor, gateway, _view) = started(source, Vec::new());

    let committed = editor
        .item_dropped(DroppedItem::Assignment(rol_key(3)))
        .await
        .unwrap_or_else(|_| unreachable!());

    let payload = editor
        .graph()
        .map(|graph| graph.payload())
        .unwrap_or_else(|| unreachable!());
    assert!(committed.payload.contains("Cajero"));
    assert_eq!(payload.edges.len(), 1);
    assert_eq!(payload.edges[0].caption, "rol");
    assert_eq!(gateway.assigned.lock().await[0].subject.kind, SubjectKind::Perfil);
}

#[tokio::test]
async fn empty_selection_rejects_delete() {
    let (mut editor, gateway, view) =
        started(rol_graph(Some(5), vec![facultad("LECTURA", 11)]), Vec::new());
    let events_before = view.events().len();

    let result = editor.delete_selected().await;

    assert!(matches!(result, Err(AppError::Precondition(message)) if message == "no node selected"));
    assert_eq!(gateway.remote_calls().await, 0);
    assert_eq!(view.events().len(), events_before);
}

#[tokio::test]
async fn batch_with_root_is_rejected_as_a_whole() {
    let (mut editor, gateway, _view) =
        started(rol_graph(Some(5), vec![facultad("LECTURA", 11)]), Vec::new());

    editor
        .toggle_select(click(&editor, 0))
        .unwrap_or_else(|_| unreachable!());
    editor
        .toggle_select(click(&editor, 1))
        .unwrap_or_else(|_| unreachable!());

    let result = editor.delete_selected().await;

    assert!(matches!(result, Err(AppError::Precondition(message)) if message.contains("root")));
    assert_eq!(gateway.remote_calls().await, 0);
    assert_eq!(member_captions(&editor), vec!["LECTURA".to_owned()]);
    assert_eq!(editor.selection().len(), 2);
    assert_eq!(editor.phase(), InteractionPhase::Idle);
}

#[tokio::test]
async fn clicks_on_an_older_revision_are_stale() {
    let (mut editor, _gateway, _view) =
        started(rol_graph(Some(5), vec![facultad("LECTURA", 11)]), Vec::new());
    let old_click = click(&editor, 1);

    editor
        .item_dropped(DroppedItem::Assignment(facultad_key("ESCRITURA")))
        .await
        .unwrap_or_else(|_| unreachable!());

    let result = editor.toggle_select(old_click);

    assert!(matches!(result, Err(AppError::StaleReference(_))));
    assert!(editor.selection().is_empty());
}

#[tokio::test]
async fn click_with_mismatched_node_is_stale() {
    let (mut editor, _gateway, _view) =
        started(rol_graph(Some(5), vec![facultad("LECTURA", 11)]), Vec::new());

    let out_of_range = editor.toggle_select(NodeClick {
        slot: 4,
        node: NodeId::new(6),
        revision: 0,
    });
    let mismatched = editor.toggle_select(NodeClick {
        slot: 1,
        node: NodeId::ROOT,
        revision: 0,
    });

    assert!(matches!(out_of_range, Err(AppError::StaleReference(_))));
    assert!(matches!(mismatched, Err(AppError::StaleReference(_))));
    assert!(editor.selection().is_empty());
}

#[tokio::test]
async fn toggling_twice_deselects_silently() {
    let (mut editor, _gateway, view) =
        started(rol_graph(Some(5), vec![facultad("LECTURA", 11)]), Vec::new());
    let target = click(&editor, 1);

    let first = editor
        .toggle_select(target)
        .unwrap_or_else(|_| unreachable!());
    let events_after_select = view.events().len();
    let second = editor
        .toggle_select(target)
        .unwrap_or_else(|_| unreachable!());

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(editor.selection().is_empty());
    assert_eq!(view.events().len(), events_after_select);
}

#[tokio::test]
async fn open_renders_the_fetched_subject() {
    let source = rol_graph(Some(5), vec![facultad("LECTURA", 11), facultad("ESCRITURA", 12)]);
    let gateway = Arc::new(FakeGateway {
        source: Some(source),
        ..FakeGateway::default()
    });
    let view = Arc::new(RecordingView::default());
    let mut editor = AssignmentEditor::new(gateway.clone(), view.clone());

    editor
        .open(SubjectRef {
            kind: SubjectKind::Rol,
            id: entity_id(5),
        })
        .await
        .unwrap_or_else(|_| unreachable!());

    let payload = editor
        .graph()
        .map(|graph| graph.payload())
        .unwrap_or_else(|| unreachable!());
    let captions: Vec<&str> = payload
        .nodes
        .iter()
        .map(|node| node.caption.as_str())
        .collect();

    assert_eq!(captions, vec!["Operador", "LECTURA", "ESCRITURA"]);
    assert_eq!(payload.nodes[0].id, NodeId::ROOT);
    assert!(payload.edges.iter().all(|edge| edge.source == NodeId::ROOT));
    assert!(matches!(
        view.events().first(),
        Some(GraphViewEvent::Rendered {
            mode: RenderMode::Start,
            drop_title,
            ..
        }) if drop_title == "Drag to assign to: Operador"
    ));
}

#[tokio::test]
async fn reload_refetches_and_clears_selection() {
    let (mut editor, gateway, _view) =
        started(rol_graph(Some(5), vec![facultad("LECTURA", 11)]), Vec::new());
    editor
        .toggle_select(click(&editor, 1))
        .unwrap_or_else(|_| unreachable!());

    editor.reload().await.unwrap_or_else(|_| unreachable!());

    assert_eq!(*gateway.fetches.lock().await, 1);
    assert!(editor.selection().is_empty());
}

#[tokio::test]
async fn refresh_re_renders_without_mutation() {
    let (editor, _gateway, view) =
        started(rol_graph(Some(5), vec![facultad("LECTURA", 11)]), Vec::new());

    let payload = editor.refresh().unwrap_or_else(|_| unreachable!());
    let current = editor
        .current_snapshot_payload()
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(payload, current);
    assert_eq!(editor.graph().map(|graph| graph.revision()), Some(0));
    assert!(matches!(
        view.events().last(),
        Some(GraphViewEvent::Rendered {
            mode: RenderMode::Refresh,
            ..
        })
    ));
}

#[tokio::test]
async fn drop_gesture_phases_are_published() {
    let (mut editor, _gateway, view) = started(rol_graph(Some(5), Vec::new()), Vec::new());

    editor.begin_drop().unwrap_or_else(|_| unreachable!());
    assert_eq!(editor.phase(), InteractionPhase::DropPending);
    editor.cancel_drop();
    assert_eq!(editor.phase(), InteractionPhase::Idle);

    editor.begin_drop().unwrap_or_else(|_| unreachable!());
    editor
        .item_dropped(DroppedItem::Assignment(facultad_key("LECTURA")))
        .await
        .unwrap_or_else(|_| unreachable!());

    let phases: Vec<InteractionPhase> = view
        .events()
        .into_iter()
        .filter_map(|event| match event {
            GraphViewEvent::PhaseChanged(phase) => Some(phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            InteractionPhase::DropPending,
            InteractionPhase::Idle,
            InteractionPhase::DropPending,
            InteractionPhase::Committing,
            InteractionPhase::Idle,
        ]
    );
}

#[tokio::test]
async fn interactions_without_a_graph_are_preconditions() {
    let gateway = Arc::new(FakeGateway::default());
    let view = Arc::new(RecordingView::default());
    let mut editor = AssignmentEditor::new(gateway.clone(), view);

    let dropped = editor
        .item_dropped(DroppedItem::Assignment(facultad_key("LECTURA")))
        .await;

    assert!(matches!(dropped, Err(AppError::Precondition(_))));
    assert!(matches!(editor.begin_drop(), Err(AppError::Precondition(_))));
    assert!(matches!(
        editor.current_snapshot_payload(),
        Err(AppError::Precondition(_))
    ));
    assert_eq!(gateway.remote_calls().await, 0);
}

proptest! {
    #[test]
    fn root_in_batch_never_reaches_the_gateway(
        selected_members in proptest::collection::btree_set(1_usize..=4, 0..=4)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap_or_else(|_| unreachable!());

        let (remote_calls, rejected, members_left) = runtime.block_on(async {
            let (mut editor, gateway, _view) = started(
                rol_graph(
                    Some(5),
                    vec![
                        facultad("AAAA", 11),
                        facultad("BBBB", 12),
                        facultad("CCCC", 13),
                        facultad("DDDD", 14),
                    ],
                ),
                Vec::new(),
            );

            let _ = editor.toggle_select(click(&editor, 0));
            for slot in &selected_members {
                let _ = editor.toggle_select(click(&editor, *slot));
            }

            let result = editor.delete_selected().await;
            (
                gateway.remote_calls().await,
                matches!(result, Err(AppError::Precondition(_))),
                member_captions(&editor).len(),
            )
        });

        prop_assert_eq!(remote_calls, 0);
        prop_assert!(rejected);
        prop_assert_eq!(members_left, 4);
    }
}
