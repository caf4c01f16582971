//! Store behaviour: id uniqueness, stage machines, shipping gate, listing, no cascade.

use pipeline_core::{
    LeadDraft, LeadId, LeadPatch, LeadQuery, LeadStage, OrderDraft, OrderPatch, OrderQuery,
    OrderStage, PipelineError, PipelineStore,
};
use rstest::rstest;
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

fn draft(name: &str, company: &str) -> LeadDraft {
    LeadDraft::new(name, format!("{}@example.com", name.to_lowercase()), company)
}

/// Lets the clock move so a refreshed `updated_at` is strictly later.
fn tick() {
    thread::sleep(Duration::from_millis(5));
}

fn seeded() -> PipelineStore {
    let mut store = PipelineStore::new();
    store.create_lead(draft("Jane", "ACME Corp").with_stage(LeadStage::Won)).expect("jane");
    store.create_lead(draft("Bob", "Globex")).expect("bob");
    store.create_lead(draft("Ann", "Initech").with_stage(LeadStage::Won)).expect("ann");
    store.create_lead(draft("Carl", "Umbrella").with_stage(LeadStage::Lost)).expect("carl");
    store
}

// ---------------------------------------------------------------------------
// 1. Lead creation
// ---------------------------------------------------------------------------

#[test]
fn lead_ids_are_unique() {
    let mut store = PipelineStore::new();
    let mut seen = HashSet::new();
    for i in 0..50 {
        let lead = store.create_lead(draft(&format!("L{i}"), "Co")).expect("create");
        assert!(seen.insert(lead.id.clone()), "duplicate id {}", lead.id);
        assert_eq!(lead.stage, LeadStage::New);
    }
}

#[rstest]
#[case("", "jane@x.com", "Acme", &["name"])]
#[case("Jane", "", "Acme", &["contact"])]
#[case("Jane", "jane@x.com", " ", &["company"])]
#[case("", "", "", &["name", "contact", "company"])]
fn create_lead_lists_missing_fields(
    #[case] name: &str,
    #[case] contact: &str,
    #[case] company: &str,
    #[case] expected: &[&str],
) {
    let mut store = PipelineStore::new();
    let err = store
        .create_lead(LeadDraft::new(name, contact, company))
        .unwrap_err();
    let fields: Vec<_> = err.field_errors().iter().map(|e| e.field).collect();
    assert_eq!(fields, expected);
    assert!(store.leads().is_empty());
}

// ---------------------------------------------------------------------------
// 2. Lead stage machine
// ---------------------------------------------------------------------------

#[rstest]
fn any_lead_stage_reachable_from_any_other(
    #[values("New", "Contacted", "Qualified", "Proposal Sent", "Won", "Lost")] from: &str,
    #[values("New", "Contacted", "Qualified", "Proposal Sent", "Won", "Lost")] to: &str,
) {
    let mut store = PipelineStore::new();
    let lead = store.create_lead(draft("Jane", "Acme")).expect("create");
    store.update_lead_stage(&lead.id, from).expect("from");
    let moved = store.update_lead_stage(&lead.id, to).expect("to");
    assert_eq!(moved.stage.label(), to);
}

#[test]
fn update_lead_stage_is_idempotent() {
    let mut store = PipelineStore::new();
    let lead = store.create_lead(draft("Jane", "Acme")).expect("create");
    tick();
    let once = store.update_lead_stage(&lead.id, "Qualified").expect("once");
    tick();
    let twice = store.update_lead_stage(&lead.id, "Qualified").expect("twice");
    assert_eq!(once.stage, twice.stage);
    assert_eq!(store.leads().len(), 1);
    assert!(once.updated_at > lead.updated_at);
    assert!(twice.updated_at > once.updated_at);
}

#[test]
fn update_lead_stage_invalid_value() {
    let mut store = PipelineStore::new();
    let lead = store.create_lead(draft("Jane", "Acme")).expect("create");
    let err = store.update_lead_stage(&lead.id, "Archived").unwrap_err();
    assert!(matches!(err, PipelineError::InvalidStage { .. }), "got: {err}");
}

#[test]
fn update_lead_missing_is_not_found() {
    let mut store = PipelineStore::new();
    let err = store
        .update_lead(&LeadId::from("lead-9"), LeadPatch::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::LeadNotFound { .. }));
    assert!(store.delete_lead(&LeadId::from("lead-9")).is_err());
}

#[test]
fn update_lead_refreshes_updated_at() {
    let mut store = PipelineStore::new();
    let lead = store.create_lead(draft("Jane", "Acme")).expect("create");
    let patch = LeadPatch {
        notes: Some("Met at trade show".into()),
        ..LeadPatch::default()
    };
    tick();
    let updated = store.update_lead(&lead.id, patch).expect("update");
    assert_eq!(updated.notes.as_deref(), Some("Met at trade show"));
    assert_eq!(updated.created_at, lead.created_at);
    assert!(updated.updated_at > lead.updated_at);
    assert_eq!(store.lead(&lead.id).map(|l| l.updated_at), Some(updated.updated_at));
}

#[test]
fn set_lead_stage_refreshes_updated_at() {
    let mut store = PipelineStore::new();
    let lead = store.create_lead(draft("Jane", "Acme")).expect("create");
    tick();
    let moved = store.set_lead_stage(&lead.id, LeadStage::Contacted).expect("stage");
    assert!(moved.updated_at > lead.updated_at);
    assert_eq!(moved.created_at, lead.created_at);
}

#[test]
fn rejected_update_keeps_updated_at() {
    let mut store = PipelineStore::new();
    let lead = store.create_lead(draft("Jane", "Acme")).expect("create");
    tick();
    let patch = LeadPatch {
        name: Some(String::new()),
        ..LeadPatch::default()
    };
    store.update_lead(&lead.id, patch).unwrap_err();
    assert_eq!(store.lead(&lead.id).map(|l| l.updated_at), Some(lead.updated_at));
}

// ---------------------------------------------------------------------------
// 3. Orders
// ---------------------------------------------------------------------------

#[rstest]
#[case(LeadStage::New)]
#[case(LeadStage::Contacted)]
#[case(LeadStage::Qualified)]
#[case(LeadStage::ProposalSent)]
#[case(LeadStage::Lost)]
fn create_order_requires_won_lead(#[case] stage: LeadStage) {
    let mut store = PipelineStore::new();
    let lead = store.create_lead(draft("Jane", "Acme").with_stage(stage)).expect("create");
    let err = store.create_order(OrderDraft::for_lead(lead.id)).unwrap_err();
    assert!(matches!(err, PipelineError::Validation { .. }), "got: {err}");
    assert!(store.orders().is_empty());
}

#[test]
fn create_order_unknown_lead_is_validation_error() {
    let mut store = PipelineStore::new();
    let err = store.create_order(OrderDraft::for_lead("lead-77")).unwrap_err();
    assert_eq!(err.code(), "VALIDATION");
}

#[rstest]
#[case(OrderStage::ReadyToDispatch)]
#[case(OrderStage::Dispatched)]
fn dispatch_stages_need_shipping_on_create(#[case] stage: OrderStage) {
    let mut store = seeded();
    let jane = store.leads()[0].id.clone();

    let err = store
        .create_order(OrderDraft::for_lead(jane.clone()).with_stage(stage))
        .unwrap_err();
    assert_eq!(err.field_errors().len(), 2);

    let order = store
        .create_order(
            OrderDraft::for_lead(jane)
                .with_stage(stage)
                .with_shipping("DHL", "123"),
        )
        .expect("with shipping");
    assert_eq!(order.stage, stage);
}

#[rstest]
#[case("Ready to Dispatch")]
#[case("dispatched")]
fn dispatch_stages_need_shipping_on_move(#[case] target: &str) {
    let mut store = seeded();
    let jane = store.leads()[0].id.clone();
    let order = store.create_order(OrderDraft::for_lead(jane)).expect("order");

    let err = store.update_order_stage(&order.id, target).unwrap_err();
    assert_eq!(err.code(), "VALIDATION");
    assert_eq!(
        store.order(&order.id).map(|o| o.stage),
        Some(OrderStage::OrderReceived)
    );

    store
        .update_order(&order.id, OrderPatch::shipping("UPS", "1Z999"))
        .expect("shipping");
    store.update_order_stage(&order.id, target).expect("move");
}

#[test]
fn update_order_stage_via_patch_is_gated() {
    let mut store = seeded();
    let jane = store.leads()[0].id.clone();
    let order = store.create_order(OrderDraft::for_lead(jane)).expect("order");
    let patch = OrderPatch {
        stage: Some(OrderStage::Dispatched),
        courier: Some("DHL".into()),
        ..OrderPatch::default()
    };
    let err = store.update_order(&order.id, patch).unwrap_err();
    assert_eq!(err.field_errors()[0].field, "tracking_number");
}

#[test]
fn order_mutations_refresh_updated_at() {
    let mut store = seeded();
    let jane = store.leads()[0].id.clone();
    let order = store.create_order(OrderDraft::for_lead(jane)).expect("order");
    assert_eq!(order.created_at, order.updated_at);

    tick();
    let edited = store
        .update_order(&order.id, OrderPatch::shipping("DHL", "123"))
        .expect("update");
    assert!(edited.updated_at > order.updated_at);

    tick();
    let moved = store
        .set_order_stage(&order.id, OrderStage::Dispatched)
        .expect("stage");
    assert!(moved.updated_at > edited.updated_at);
    assert_eq!(moved.created_at, order.created_at);
    assert_eq!(store.order(&order.id).map(|o| o.updated_at), Some(moved.updated_at));
}

#[test]
fn order_stage_rejects_lead_stage_names() {
    let mut store = seeded();
    let jane = store.leads()[0].id.clone();
    let order = store.create_order(OrderDraft::for_lead(jane)).expect("order");
    let err = store.update_order_stage(&order.id, "Won").unwrap_err();
    assert_eq!(err.code(), "INVALID_STAGE");
}

#[test]
fn deleting_lead_keeps_its_orders() {
    let mut store = seeded();
    let jane = store.leads()[0].id.clone();
    let order = store.create_order(OrderDraft::for_lead(jane.clone())).expect("order");

    store.delete_lead(&jane).expect("delete");
    assert!(store.lead(&jane).is_none());
    assert_eq!(store.orders_for_lead(&jane).len(), 1);
    assert_eq!(store.order(&order.id).map(|o| o.lead_name.as_str()), Some("Jane"));
}

// ---------------------------------------------------------------------------
// 4. Listing
// ---------------------------------------------------------------------------

#[test]
fn list_leads_by_stage_keeps_insertion_order() {
    let store = seeded();
    let won: Vec<_> = store
        .list_leads(&LeadQuery::stage(LeadStage::Won))
        .into_iter()
        .map(|l| l.name.as_str())
        .collect();
    assert_eq!(won, vec!["Jane", "Ann"]);
    assert_eq!(store.won_leads().len(), 2);
}

#[rstest]
#[case("acme", &["Jane"])]
#[case("ACME", &["Jane"])]
#[case("bob@", &["Bob"])]
#[case("an", &["Jane", "Ann"])]
#[case("", &["Jane", "Bob", "Ann", "Carl"])]
#[case("nobody", &[])]
fn list_leads_search(#[case] text: &str, #[case] expected: &[&str]) {
    let store = seeded();
    let names: Vec<_> = store
        .list_leads(&LeadQuery::search(text))
        .into_iter()
        .map(|l| l.name.as_str())
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn list_leads_combines_stage_and_search() {
    let store = seeded();
    let query = LeadQuery {
        stage: Some(LeadStage::Won),
        search: Some("initech".into()),
    };
    let names: Vec<_> = store.list_leads(&query).into_iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Ann"]);
}

#[test]
fn list_orders_searches_shipping_fields() {
    let mut store = seeded();
    let jane = store.leads()[0].id.clone();
    let ann = store.leads()[2].id.clone();
    store
        .create_order(OrderDraft::for_lead(jane).with_details("Blue widgets"))
        .expect("jane order");
    store
        .create_order(
            OrderDraft::for_lead(ann)
                .with_stage(OrderStage::Dispatched)
                .with_shipping("FedEx", "TRK-42"),
        )
        .expect("ann order");

    let by = |q: &str| -> Vec<String> {
        store
            .list_orders(&OrderQuery::search(q))
            .into_iter()
            .map(|o| o.lead_name.clone())
            .collect()
    };
    assert_eq!(by("widgets"), vec!["Jane"]);
    assert_eq!(by("fedex"), vec!["Ann"]);
    assert_eq!(by("trk-42"), vec!["Ann"]);
    assert_eq!(by("ann"), vec!["Ann"]);

    let dispatched = store.list_orders(&OrderQuery::stage(OrderStage::Dispatched));
    assert_eq!(dispatched.len(), 1);
}

#[test]
fn lead_board_filters_by_search() {
    let store = seeded();
    let board = store.lead_board(Some("globex"));
    let total: usize = board.iter().map(|c| c.len()).sum();
    assert_eq!(total, 1);
    assert_eq!(board[0].stage, LeadStage::New);
    assert_eq!(board[0].records[0].name, "Bob");
}

// ---------------------------------------------------------------------------
// 5. End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn jane_doe_from_lead_to_dispatch() {
    let mut store = PipelineStore::new();
    let lead = store
        .create_lead(LeadDraft::new("Jane Doe", "jane@x.com", "Acme"))
        .expect("create lead");
    assert_eq!(lead.stage, LeadStage::New);

    let lead = store.update_lead_stage(&lead.id, "Won").expect("won");
    assert_eq!(lead.stage, LeadStage::Won);

    let order = store
        .create_order(OrderDraft::for_lead(lead.id.clone()))
        .expect("create order");
    assert_eq!(order.lead_name, "Jane Doe");
    assert_eq!(order.stage, OrderStage::OrderReceived);

    let err = store.update_order_stage(&order.id, "Dispatched").unwrap_err();
    assert!(matches!(err, PipelineError::Validation { .. }));

    store
        .update_order(&order.id, OrderPatch::shipping("DHL", "123"))
        .expect("shipping");
    let order = store
        .update_order_stage(&order.id, "Dispatched")
        .expect("dispatch");
    assert_eq!(order.stage, OrderStage::Dispatched);
    assert_eq!(order.courier.as_deref(), Some("DHL"));
    assert_eq!(order.tracking_number.as_deref(), Some("123"));
}
