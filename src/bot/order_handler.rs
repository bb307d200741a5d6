//! Order Handler module for orders submitted through the menu web app

use anyhow::Result;
use tracing::{info, warn};

// Import localization
use crate::localization::t;

use crate::fanout::{report_failures, send_to_all, DispatchResult};
use crate::messenger::Messenger;
use crate::order::OrderDetails;

// Import UI builder functions
use super::ui_builder::{format_customer_order, format_staff_order};
use super::{AppContext, Caller};

/// Relay one order: notify staff, escalate delivery failures, confirm to the customer.
///
/// The payload is never rejected; anything unreadable is shown as an empty cart.
/// Staff delivery problems are reported only to the escalation recipient.
pub async fn handle_order<M>(
    messenger: &M,
    ctx: &AppContext,
    caller: &Caller,
    raw: &str,
) -> Result<DispatchResult>
where
    M: Messenger + ?Sized,
{
    info!(user_id = %caller.user_id, payload = %raw, "Received web app data");

    if let Err(e) = messenger
        .send_text(caller.chat_id.into(), t("order-received"), None)
        .await
    {
        warn!(user_id = %caller.user_id, error = %e, "Failed to acknowledge order");
    }

    let details = OrderDetails::from_raw(raw);
    info!(
        user_id = %caller.user_id,
        order_id = %details.order_id,
        items = details.order.quantities.len(),
        total = %details.total,
        "Order normalized"
    );

    let staff_text = format_staff_order(&details, &ctx.config.brand, &caller.telegram_label());
    let results = send_to_all(messenger, &ctx.config.admin_ids, &staff_text).await;

    report_failures(
        messenger,
        ctx.config.main_admin_id,
        &results,
        &format!("order_id={}", details.order_id),
    )
    .await;

    messenger
        .send_text(caller.chat_id.into(), format_customer_order(&details), None)
        .await?;

    info!(user_id = %caller.user_id, order_id = %details.order_id, "Order confirmed to customer");
    Ok(results)
}
