use super::*;
use shared::order::{KitchenBucket, derive_display};
use shared::session::CustomerSession;

#[test]
fn test_full_kitchen_flow() {
    let manager = create_test_manager();
    let order = place_sample_order(&manager);

    manager
        .transition_status(&order.order_id, OrderStatus::Approved)
        .unwrap();
    let cooking = manager
        .transition_status(&order.order_id, OrderStatus::Cooking)
        .unwrap();

    let display = derive_display(&cooking, 0, 25);
    assert_eq!(display.current_step_index, 2);
    assert_eq!(display.progress_percent, 60.0);

    let ready = manager
        .transition_status(&order.order_id, OrderStatus::Ready)
        .unwrap();
    assert_eq!(ready.status, OrderStatus::Ready);
    assert_eq!(ready.total, 451.5);

    // ready is terminal in the lifecycle table
    assert!(matches!(
        manager.transition_status(&order.order_id, OrderStatus::Served),
        Err(ManagerError::IllegalTransition { .. })
    ));
}

#[test]
fn test_buckets_follow_status() {
    let manager = create_test_manager();
    let pending = place_sample_order(&manager);
    let cooking = place_sample_order(&manager);
    let ready = place_sample_order(&manager);

    manager
        .transition_status(&cooking.order_id, OrderStatus::Approved)
        .unwrap();
    manager
        .transition_status(&cooking.order_id, OrderStatus::Cooking)
        .unwrap();
    for target in [OrderStatus::Approved, OrderStatus::Cooking, OrderStatus::Ready] {
        manager.transition_status(&ready.order_id, target).unwrap();
    }

    let ids = |bucket| -> Vec<String> {
        manager
            .list_bucket(bucket)
            .unwrap()
            .into_iter()
            .map(|o| o.order_id)
            .collect()
    };
    assert_eq!(ids(KitchenBucket::Pending), vec![pending.order_id.clone()]);
    assert_eq!(ids(KitchenBucket::InProgress), vec![cooking.order_id.clone()]);
    assert_eq!(ids(KitchenBucket::Ready), vec![ready.order_id.clone()]);
    assert!(ids(KitchenBucket::Served).is_empty());

    let active: Vec<String> = manager
        .get_active_orders()
        .unwrap()
        .into_iter()
        .map(|o| o.order_id)
        .collect();
    assert_eq!(active.len(), 2);
    assert!(active.contains(&pending.order_id));
    assert!(active.contains(&cooking.order_id));
}

#[test]
fn test_ledger_is_newest_first() {
    let manager = create_test_manager();
    let first = place_sample_order(&manager);
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = place_sample_order(&manager);

    let ledger = manager.list_orders().unwrap();
    assert_eq!(ledger[0].order_id, second.order_id);
    assert_eq!(ledger[1].order_id, first.order_id);
}

#[test]
fn test_customer_session_checkout() {
    let manager = create_test_manager();
    let store = shared::session::MemoryStore::new();

    let mut session = CustomerSession::default();
    session.bind_table(Some("7".to_string()));
    session.customer_name = Some("Ravi".to_string());
    session.add_item(naan(), 2, Some("crispy".to_string())).unwrap();
    session.persist(&store).unwrap();

    // Reload, then check out
    let mut session = CustomerSession::restore(&store).unwrap();
    let cmd = session.checkout_command(PaymentMethod::Cash).unwrap();
    let order = manager.submit(cmd).unwrap();
    session.complete_checkout();

    assert_eq!(order.table_id.as_deref(), Some("7"));
    assert_eq!(order.customer_name.as_deref(), Some("Ravi"));
    assert_eq!(order.items[0].notes.as_deref(), Some("crispy"));
    assert_eq!(order.total, 84.0);
    assert!(session.cart.is_empty());
}

#[tokio::test]
async fn test_subscribers_receive_committed_events() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let order = place_sample_order(&manager);
    manager
        .transition_status(&order.order_id, OrderStatus::Approved)
        .unwrap();

    let placed = rx.recv().await.unwrap();
    assert_eq!(placed.event_type, OrderEventType::OrderPlaced);
    assert_eq!(placed.order_id, order.order_id);

    let changed = rx.recv().await.unwrap();
    assert_eq!(changed.event_type, OrderEventType::StatusChanged);
    assert_eq!(changed.sequence, placed.sequence + 1);

    // Rejected commands broadcast nothing
    let _ = manager.transition_status(&order.order_id, OrderStatus::Served);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_execute_command_reports_illegal_transition() {
    let manager = create_test_manager();
    let order = place_sample_order(&manager);

    let resp = manager.execute_command(transition_cmd(&order.order_id, OrderStatus::Ready));
    assert!(!resp.success);
    let error = resp.error.unwrap();
    assert_eq!(error.code, shared::order::CommandErrorCode::IllegalTransition);
    assert_eq!(error.message, "Cannot move order from pending to ready");
}
