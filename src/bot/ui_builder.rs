//! UI Builder module for creating keyboards and formatting messages
//!
//! Everything user data flows into is HTML-escaped here.

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    WebAppInfo,
};
use teloxide::utils::html;
use url::Url;

// Import localization
use crate::localization::{t, t_args};

use crate::fanout::DispatchResult;
use crate::order::{OrderDetails, CURRENCY, PLACEHOLDER};

use super::Caller;

/// Reply keyboard with a single button opening the menu web app
pub fn create_webapp_keyboard(webapp_url: &Url) -> KeyboardMarkup {
    let button = KeyboardButton::new(t("button-open")).request(ButtonRequest::WebApp(WebAppInfo {
        url: webapp_url.clone(),
    }));

    KeyboardMarkup::new(vec![vec![button]]).resize_keyboard()
}

/// Inline keyboard for the channel post, deep-linking into the bot
pub fn create_channel_keyboard(deep_link: &Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
        t("button-open"),
        deep_link.clone(),
    )]])
}

pub fn welcome_text(brand: &str) -> String {
    let brand = html::escape(brand);
    ["welcome-ru", "welcome-uz", "welcome-en"]
        .iter()
        .map(|key| t_args(key, &[("brand", brand.as_str())]))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn channel_post_text(brand: &str) -> String {
    let brand = html::escape(brand);
    ["channel-post-ru", "channel-post-uz", "channel-post-en"]
        .iter()
        .map(|key| {
            format!(
                "{}\n{}",
                t_args(key, &[("brand", brand.as_str())]),
                t(&format!("{key}-body"))
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Reply to /id
pub fn format_caller_info(caller: &Caller) -> String {
    let id = caller.user_id.to_string();
    let username = caller
        .username
        .as_ref()
        .map(|u| html::escape(&format!("@{u}")))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let name = html::escape(&caller.full_name);

    [
        t("id-title"),
        t_args("id-user-id", &[("id", id.as_str())]),
        t_args("id-username", &[("username", username.as_str())]),
        t_args("id-name", &[("name", name.as_str())]),
    ]
    .join("\n")
}

/// Reply to /test_admins
pub fn format_test_summary(results: &DispatchResult) -> String {
    let delivered: Vec<String> = results.succeeded().iter().map(ToString::to_string).collect();
    let delivered = if delivered.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        delivered.join(", ")
    };

    let failed: Vec<String> = results
        .failed()
        .iter()
        .map(|(id, err)| format!("{}: {}", id, html::escape(&err.to_string())))
        .collect();
    let failed = if failed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        failed.join("\n")
    };

    format!(
        "{}\n{}\n{}\n{}",
        t("test-result-title"),
        t_args("test-result-delivered", &[("recipients", delivered.as_str())]),
        t("test-result-failed"),
        failed
    )
}

/// Human label for the payment method
pub fn payment_label(payment: &str) -> String {
    match payment {
        "cash" => t("payment-cash"),
        "click" => t("payment-click"),
        other => html::escape(other),
    }
}

/// Human label for the fulfillment type
pub fn order_type_label(order_type: &str) -> String {
    match order_type {
        "delivery" => t("type-delivery"),
        "pickup" => t("type-pickup"),
        other => html::escape(other),
    }
}

fn escaped_lines(details: &OrderDetails) -> String {
    details
        .order
        .lines
        .iter()
        .map(|line| html::escape(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn order_summary(details: &OrderDetails) -> Vec<String> {
    let total = html::escape(&details.total);
    let order_type = order_type_label(&details.order_type);
    let payment = payment_label(&details.payment);
    let address = html::escape(&details.address);
    let phone = html::escape(&details.phone);

    vec![
        t_args("order-total", &[("total", total.as_str()), ("currency", CURRENCY)]),
        t_args("order-type", &[("value", order_type.as_str())]),
        t_args("order-payment", &[("value", payment.as_str())]),
        t_args("order-address", &[("value", address.as_str())]),
        t_args("order-phone", &[("value", phone.as_str())]),
    ]
}

fn comment_line(details: &OrderDetails) -> Option<String> {
    details.comment.as_ref().map(|comment| {
        let comment = html::escape(comment);
        t_args("order-comment", &[("value", comment.as_str())])
    })
}

fn order_id_line(details: &OrderDetails) -> String {
    let order_id = html::escape(&details.order_id);
    t_args("order-id", &[("order_id", order_id.as_str())])
}

/// Order notification for staff, including who sent it
pub fn format_staff_order(details: &OrderDetails, brand: &str, sender_label: &str) -> String {
    let brand = html::escape(brand);
    let sender = html::escape(sender_label);

    let mut text = format!(
        "{}\n{}\n\n{}\n\n",
        t_args("order-staff-header", &[("brand", brand.as_str())]),
        order_id_line(details),
        escaped_lines(details)
    );

    let mut fields = order_summary(details);
    fields.push(t_args("order-telegram", &[("value", sender.as_str())]));
    fields.extend(comment_line(details));
    text.push_str(&fields.join("\n"));

    text
}

/// Order confirmation for the customer
pub fn format_customer_order(details: &OrderDetails) -> String {
    let mut text = format!(
        "{}\n{}\n\n{}\n\n{}\n{}\n\n",
        t("order-customer-header"),
        t("order-customer-thanks"),
        order_id_line(details),
        t("order-contents"),
        escaped_lines(details)
    );

    let mut fields = order_summary(details);
    fields.extend(comment_line(details));
    text.push_str(&fields.join("\n"));

    text
}
