//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderCommand, OrderCommandPayload, OrderEvent};

mod place_order;
mod set_estimated_time;
mod transition_status;

pub use place_order::PlaceOrderAction;
pub use set_estimated_time::{SetEstimatedTimeAction, SetItemEstimatedTimeAction};
pub use transition_status::TransitionStatusAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    PlaceOrder(PlaceOrderAction),
    TransitionStatus(TransitionStatusAction),
    SetEstimatedTime(SetEstimatedTimeAction),
    SetItemEstimatedTime(SetItemEstimatedTimeAction),
}

impl CommandHandler for CommandAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::PlaceOrder(action) => action.execute(ctx, metadata),
            CommandAction::TransitionStatus(action) => action.execute(ctx, metadata),
            CommandAction::SetEstimatedTime(action) => action.execute(ctx, metadata),
            CommandAction::SetItemEstimatedTime(action) => action.execute(ctx, metadata),
        }
    }
}

impl CommandAction {
    /// Build the action for `cmd`
    ///
    /// This is the ONLY place with a match on OrderCommandPayload. PlaceOrder
    /// needs the order id the manager allocated before the transaction.
    pub fn from_command(cmd: &OrderCommand, new_order_id: Option<String>) -> Result<Self, OrderError> {
        let action = match &cmd.payload {
            OrderCommandPayload::PlaceOrder {
                table_id,
                customer_name,
                payment_method,
                lines,
            } => {
                let order_id = new_order_id.ok_or_else(|| {
                    OrderError::InvalidOperation(
                        shared::order::CommandErrorCode::InternalError,
                        "order id must be allocated before PlaceOrder".to_string(),
                    )
                })?;
                CommandAction::PlaceOrder(PlaceOrderAction {
                    order_id,
                    table_id: table_id.clone(),
                    customer_name: customer_name.clone(),
                    payment_method: *payment_method,
                    lines: lines.clone(),
                })
            }
            OrderCommandPayload::TransitionStatus { order_id, target } => {
                CommandAction::TransitionStatus(TransitionStatusAction {
                    order_id: order_id.clone(),
                    target: *target,
                })
            }
            OrderCommandPayload::SetEstimatedTime { order_id, minutes } => {
                CommandAction::SetEstimatedTime(SetEstimatedTimeAction {
                    order_id: order_id.clone(),
                    minutes: *minutes,
                })
            }
            OrderCommandPayload::SetItemEstimatedTime {
                order_id,
                item_index,
                minutes,
            } => CommandAction::SetItemEstimatedTime(SetItemEstimatedTimeAction {
                order_id: order_id.clone(),
                item_index: *item_index,
                minutes: *minutes,
            }),
        };
        Ok(action)
    }
}
