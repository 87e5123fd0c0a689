//! Delivery of escalation drafts to whatever ticketing system sits
//! outside the core (`spec.md` §2 "Escalation builder", §9 "Escalation
//! is a side channel, not an error").
//!
//! `TicketNotifier` is the seam at which this crate stops: the core
//! assembles the draft, the notifier delivers it. Grounded in the
//! teacher's `layer0::hook::Hook` shape (`async_trait`, `Send + Sync`
//! supertrait, errors logged rather than propagated to the caller).

use async_trait::async_trait;
use lighthouse_types::EscalationDraft;
use thiserror::Error;

/// Failure to deliver an escalation ticket to the external system.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The downstream ticketing system rejected or could not be reached.
    #[error("escalation delivery failed: {0}")]
    DeliveryFailed(String),
}

/// A fully-formed ticket ready for an external tracker, pairing the
/// draft with the request it came from.
#[derive(Debug, Clone)]
pub struct EscalationTicket {
    /// The request this escalation was produced for.
    pub request_id: String,
    /// The draft assembled by the `escalate_to_human` tool.
    pub draft: EscalationDraft,
}

/// Delivers escalation tickets to an external system (issue tracker,
/// helpdesk queue, ...). Implementations decide what "delivered" means;
/// a delivery failure is logged by the caller and never surfaces to the
/// end user, since the escalation draft is still returned in the
/// response regardless.
#[async_trait]
pub trait TicketNotifier: Send + Sync {
    /// Deliver `ticket`. Failure here does not undo the escalation
    /// already recorded in the response.
    async fn notify(&self, ticket: EscalationTicket) -> Result<(), NotifyError>;
}

/// A notifier that only logs; the default until a real ticketing
/// integration is configured.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl TicketNotifier for NoopNotifier {
    async fn notify(&self, ticket: EscalationTicket) -> Result<(), NotifyError> {
        tracing::info!(
            request_id = %ticket.request_id,
            title = %ticket.draft.title,
            "escalation draft recorded with no ticketing backend configured"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighthouse_types::RequestType;

    fn draft() -> EscalationDraft {
        EscalationDraft {
            title: "Support multi-currency rounding mode".to_string(),
            request_type: RequestType::FeatureRequest,
            problem_statement: "Customer needs bankers rounding on invoice totals".to_string(),
            suggested_docs: vec![],
        }
    }

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        let notifier = NoopNotifier;
        let ticket = EscalationTicket {
            request_id: "r1".to_string(),
            draft: draft(),
        };
        assert!(notifier.notify(ticket).await.is_ok());
    }
}
