//! Triage classifier — terminal decision for one conversation view.

use serde::{Deserialize, Serialize};

use super::join::ConversationView;

/// Triage decision for the latest message of a conversation.
///
/// Classification is total: every view maps to exactly one action and the
/// function cannot fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TriageAction {
    /// You asked a question and nobody answered — poke them, then offer a
    /// reply to the conversation's address.
    FlagForFollowup,
    /// Nothing to do for this conversation.
    Skip { reason: SkipReason },
    /// Inbound message worth reading; render it and offer a reply.
    PresentAndReply,
}

/// Why a conversation was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Outgoing message without a question mark — no follow-up needed.
    OutgoingNoQuestion,
    /// Inbound message of two words or fewer (empty text counts as zero).
    TooShort,
}

impl TriageAction {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FlagForFollowup => "flag_for_followup",
            Self::Skip { .. } => "skip",
            Self::PresentAndReply => "present_and_reply",
        }
    }
}

/// Classify the latest message of a conversation.
pub fn classify(view: &ConversationView) -> TriageAction {
    let text = view.text_or_empty();
    if view.outgoing {
        if text.contains('?') {
            TriageAction::FlagForFollowup
        } else {
            TriageAction::Skip {
                reason: SkipReason::OutgoingNoQuestion,
            }
        }
    } else if text.split_whitespace().count() <= 2 {
        TriageAction::Skip {
            reason: SkipReason::TooShort,
        }
    } else {
        TriageAction::PresentAndReply
    }
}
