use super::*;
use shared::models::MenuItemRef;
use shared::order::{EventPayload, OrderEventType, OrderLineInput};

mod test_flows;

fn create_test_manager() -> OrdersManager {
    let storage = OrderStorage::open_in_memory().unwrap();
    OrdersManager::with_storage(storage)
}

fn naan() -> MenuItemRef {
    MenuItemRef::new("naan", "Naan", 40.0)
}

fn butter_chicken() -> MenuItemRef {
    MenuItemRef::new("bc", "Butter Chicken", 350.0)
}

/// 2× Naan + 1× Butter Chicken
fn sample_cart() -> Cart {
    let mut cart = Cart::new();
    cart.add_item(naan(), 2, None);
    cart.add_item(butter_chicken(), 1, None);
    cart
}

fn place_sample_order(manager: &OrdersManager) -> OrderRecord {
    manager
        .create_order(&sample_cart(), Some("12"), PaymentMethod::Online)
        .unwrap()
}

fn place_order_cmd(lines: Vec<OrderLineInput>) -> OrderCommand {
    OrderCommand::new(
        Actor::Customer,
        OrderCommandPayload::PlaceOrder {
            table_id: Some("12".to_string()),
            customer_name: None,
            payment_method: PaymentMethod::Cash,
            lines,
        },
    )
}

fn transition_cmd(order_id: &str, target: OrderStatus) -> OrderCommand {
    OrderCommand::new(
        Actor::Kitchen,
        OrderCommandPayload::TransitionStatus {
            order_id: order_id.to_string(),
            target,
        },
    )
}
