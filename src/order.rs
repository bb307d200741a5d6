//! # Order Payload Module
//!
//! Normalizes the loosely-structured JSON submitted by the menu web app into
//! display lines, a canonical quantity mapping and labeled order metadata.
//!
//! ## Accepted shapes
//!
//! - `order`: object of item key → quantity
//! - `cart`: same shape as `order`, consulted only when `order` yields nothing
//! - `items`: array of records with `name`/`title`/`id`, `qty`, `price`, `sum`
//! - `total`/`total_num`, `payment`, `type`, `address`, `phone`, `comment`, `order_id`
//!
//! Every field is optional and every access is type-checked. Malformed input
//! degrades to defaults and never produces an error.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Line shown when nothing usable was found in the payload
pub const EMPTY_CART_LINE: &str = "⚠️ Корзина пустая";

/// Placeholder for missing names and metadata fields
pub const PLACEHOLDER: &str = "—";

/// Currency suffix appended to every rendered amount
pub const CURRENCY: &str = "сум";

/// Canonical view of the cart part of a payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedOrder {
    /// Human-readable lines, never empty
    pub lines: Vec<String>,
    /// Item key → strictly positive quantity, in submission order
    pub quantities: IndexMap<String, i64>,
}

/// Everything the bot needs to render an order, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: NormalizedOrder,
    /// Total amount as shown to humans (without currency)
    pub total: String,
    pub payment: String,
    pub order_type: String,
    pub address: String,
    pub phone: String,
    pub comment: Option<String>,
    pub order_id: String,
}

impl OrderDetails {
    /// Build order details from a parsed payload object
    pub fn from_payload(data: &Map<String, Value>) -> Self {
        let order = build_order_lines(data);

        let total = match clean_str(data.get("total")) {
            total if !total.is_empty() => total,
            _ => format_amount(data.get("total_num").unwrap_or(&Value::Null)),
        };

        let comment = Some(clean_str(data.get("comment"))).filter(|c| !c.is_empty());

        Self {
            order,
            total,
            payment: or_placeholder(clean_str(data.get("payment"))),
            order_type: or_placeholder(clean_str(data.get("type"))),
            address: or_placeholder(clean_str(data.get("address"))),
            phone: or_placeholder(clean_str(data.get("phone"))),
            comment,
            order_id: or_placeholder(clean_str(data.get("order_id"))),
        }
    }

    /// Parse raw web app data and build the details in one go
    pub fn from_raw(raw: &str) -> Self {
        Self::from_payload(&parse_payload(raw))
    }
}

fn or_placeholder(value: String) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value
    }
}

/// Parse inbound text as a JSON object.
///
/// Empty input, invalid JSON and non-object JSON all yield an empty object.
pub fn parse_payload(raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!(kind = json_kind(&other), "Order payload is not an object, treating as empty");
            Map::new()
        }
        Err(e) => {
            debug!(error = %e, "Order payload is not valid JSON, treating as empty");
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Permissive integer coercion.
///
/// Integers pass through, floats are truncated toward zero, strings are
/// trimmed and stripped of inner whitespace before being read as a number.
/// Booleans, null, arrays, objects and anything unparseable give `default`.
pub fn coerce_quantity(value: Option<&Value>, default: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => number_to_i64(n).unwrap_or(default),
        Some(Value::String(s)) => parse_numeric_str(s).unwrap_or(default),
        _ => default,
    }
}

fn number_to_i64(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64().and_then(truncate_finite)
}

fn parse_numeric_str(s: &str) -> Option<i64> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    if let Ok(i) = compact.parse::<i64>() {
        return Some(i);
    }
    compact.parse::<f64>().ok().and_then(truncate_finite)
}

fn truncate_finite(f: f64) -> Option<i64> {
    if f.is_finite() {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

/// Render a scalar as trimmed text; absent and null become an empty string
pub fn clean_str(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Format an amount with digits grouped by three, e.g. `125000` → `125 000`.
///
/// Values that do not coerce to an integer are shown as `0`.
pub fn format_amount(value: &Value) -> String {
    group_thousands(coerce_quantity(Some(value), 0))
}

/// Group the digits of an integer by three using a space separator
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    grouped
}

/// Build display lines and the canonical quantity mapping from a payload
pub fn build_order_lines(data: &Map<String, Value>) -> NormalizedOrder {
    let mut quantities = IndexMap::new();

    if let Some(Value::Object(order)) = data.get("order") {
        collect_quantities(order, &mut quantities);
    }

    if quantities.is_empty() {
        if let Some(Value::Object(cart)) = data.get("cart") {
            collect_quantities(cart, &mut quantities);
        }
    }

    let mut lines = Vec::new();

    if let Some(Value::Array(items)) = data.get("items") {
        let seed_from_items = quantities.is_empty();

        for item in items {
            let Value::Object(item) = item else {
                continue;
            };

            let name = ["name", "title", "id"]
                .iter()
                .map(|key| clean_str(item.get(*key)))
                .find(|s| !s.is_empty())
                .unwrap_or_else(|| PLACEHOLDER.to_string());

            let qty = coerce_quantity(item.get("qty"), 0);
            if qty <= 0 {
                continue;
            }

            if seed_from_items {
                let key = Some(clean_str(item.get("id")))
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| name.clone());
                // A repeated key keeps the latest quantity
                quantities.insert(key, qty);
            }

            let sum = coerce_quantity(item.get("sum"), 0);
            let price = coerce_quantity(item.get("price"), 0);

            let line = if sum > 0 {
                format!("• {name} × {qty} = {} {CURRENCY}", group_thousands(sum))
            } else if price > 0 {
                format!(
                    "• {name} × {qty} = {} {CURRENCY}",
                    group_thousands(price.saturating_mul(qty))
                )
            } else {
                format!("• {name} × {qty}")
            };
            lines.push(line);
        }
    }

    if lines.is_empty() {
        lines.extend(quantities.iter().map(|(key, qty)| format!("• {key} × {qty}")));
    }

    if lines.is_empty() {
        lines.push(EMPTY_CART_LINE.to_string());
    }

    NormalizedOrder { lines, quantities }
}

fn collect_quantities(source: &Map<String, Value>, quantities: &mut IndexMap<String, i64>) {
    for (key, value) in source {
        let qty = coerce_quantity(Some(value), 0);
        if qty > 0 {
            quantities.insert(key.clone(), qty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_quantity_strings() {
        assert_eq!(coerce_quantity(Some(&json!("  12 ")), 0), 12);
        assert_eq!(coerce_quantity(Some(&json!("1 000")), 0), 1000);
        assert_eq!(coerce_quantity(Some(&json!("2.9")), 0), 2);
        assert_eq!(coerce_quantity(Some(&json!("abc")), 0), 0);
        assert_eq!(coerce_quantity(Some(&json!("   ")), 7), 7);
        assert_eq!(coerce_quantity(Some(&json!("inf")), 0), 0);
    }

    #[test]
    fn test_coerce_quantity_rejects_booleans() {
        assert_eq!(coerce_quantity(Some(&json!(true)), 0), 0);
        assert_eq!(coerce_quantity(Some(&json!(false)), 5), 5);
    }

    #[test]
    fn test_coerce_quantity_numbers() {
        assert_eq!(coerce_quantity(Some(&json!(3)), 0), 3);
        assert_eq!(coerce_quantity(Some(&json!(3.7)), 0), 3);
        assert_eq!(coerce_quantity(Some(&json!(-2.5)), 0), -2);
        assert_eq!(coerce_quantity(None, 4), 4);
        assert_eq!(coerce_quantity(Some(&Value::Null), 4), 4);
        assert_eq!(coerce_quantity(Some(&json!([1])), 0), 0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1 000");
        assert_eq!(group_thousands(125000), "125 000");
        assert_eq!(group_thousands(-1234567), "-1 234 567");
    }

    #[test]
    fn test_clean_str() {
        assert_eq!(clean_str(None), "");
        assert_eq!(clean_str(Some(&Value::Null)), "");
        assert_eq!(clean_str(Some(&json!("  Chilonzor 5 "))), "Chilonzor 5");
        assert_eq!(clean_str(Some(&json!(42))), "42");
    }
}
