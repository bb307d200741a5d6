//! # Fan-Out Module
//!
//! Sends one message to every staff recipient, recording the outcome per
//! recipient, and escalates any failures to a single designated recipient.
//!
//! Sends are sequential single attempts. A failure for one recipient never
//! stops delivery to the next one.

use teloxide::types::ChatId;
use teloxide::utils::html;
use tracing::{debug, error, info, warn};

use crate::delivery_errors::{DeliveryError, DeliveryErrorKind};
use crate::localization::{t, t_args};
use crate::messenger::Messenger;

/// Per-recipient outcome of one fan-out, in recipient order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchResult {
    results: Vec<(ChatId, Result<(), DeliveryError>)>,
}

impl DispatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a recipient, replacing an earlier one
    pub fn record(&mut self, recipient: ChatId, outcome: Result<(), DeliveryError>) {
        match self.results.iter_mut().find(|(id, _)| *id == recipient) {
            Some(entry) => entry.1 = outcome,
            None => self.results.push((recipient, outcome)),
        }
    }

    pub fn get(&self, recipient: ChatId) -> Option<&Result<(), DeliveryError>> {
        self.results
            .iter()
            .find(|(id, _)| *id == recipient)
            .map(|(_, outcome)| outcome)
    }

    /// `Some(true)` if the message reached the recipient
    pub fn is_ok(&self, recipient: ChatId) -> Option<bool> {
        self.get(recipient).map(Result::is_ok)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ChatId, Result<(), DeliveryError>)> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> Vec<ChatId> {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_ok())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn failed(&self) -> Vec<(ChatId, &DeliveryError)> {
        self.results
            .iter()
            .filter_map(|(id, outcome)| outcome.as_ref().err().map(|e| (*id, e)))
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|(_, outcome)| outcome.is_err())
    }
}

/// Send `text` to every recipient, one attempt each
pub async fn send_to_all<M>(messenger: &M, recipients: &[ChatId], text: &str) -> DispatchResult
where
    M: Messenger + ?Sized,
{
    let mut results = DispatchResult::new();

    for &recipient in recipients {
        let outcome = messenger
            .send_text(recipient.into(), text.to_string(), None)
            .await
            .map(|_| ());

        match &outcome {
            Ok(()) => debug!(recipient = %recipient, "Delivered to staff recipient"),
            Err(e) if e.kind == DeliveryErrorKind::Other => {
                error!(recipient = %recipient, error = %e, "Unexpected error sending to staff recipient")
            }
            Err(e) => warn!(recipient = %recipient, error = %e, "Failed to deliver to staff recipient"),
        }

        results.record(recipient, outcome);
    }

    info!(
        recipients = results.len(),
        failed = results.failed().len(),
        "Fan-out completed"
    );

    results
}

/// Render the escalation report, or `None` if every delivery succeeded
pub fn format_failure_report(results: &DispatchResult, context: &str) -> Option<String> {
    let failed = results.failed();
    if failed.is_empty() {
        return None;
    }

    let mut report = t("failure-report-title");
    report.push('\n');

    if !context.is_empty() {
        let context = html::escape(context);
        report.push_str(&t_args("failure-report-context", &[("context", context.as_str())]));
        report.push('\n');
    }

    let lines: Vec<String> = failed
        .iter()
        .map(|(id, err)| {
            format!(
                "• <code>{}</code> — <code>{}</code>",
                id,
                html::escape(&err.to_string())
            )
        })
        .collect();
    report.push_str(&lines.join("\n"));

    Some(report)
}

/// Send one consolidated failure report to the escalation recipient.
///
/// Does nothing when there are no failures. A failure of the report itself is
/// only logged.
pub async fn report_failures<M>(
    messenger: &M,
    escalation: ChatId,
    results: &DispatchResult,
    context: &str,
) where
    M: Messenger + ?Sized,
{
    let Some(report) = format_failure_report(results, context) else {
        return;
    };

    warn!(
        escalation = %escalation,
        failed = results.failed().len(),
        context = %context,
        "Escalating delivery failures"
    );

    if let Err(e) = messenger.send_text(escalation.into(), report, None).await {
        error!(escalation = %escalation, error = %e, "Failed to send failure report");
    }
}
