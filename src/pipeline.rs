//! Triage pipeline — wires the source, identity store, classifier and
//! outward collaborators into one sequential run.

use tracing::{debug, info, warn};

use crate::config::TriageConfig;
use crate::dispatch::{Announcer, OutgoingCheck, ReplyDispatcher, check_outgoing};
use crate::error::Result;
use crate::identity::ContactBook;
use crate::prompt::Prompt;
use crate::render::boxed_notice;
use crate::source::MessageSource;
use crate::triage::{ConversationView, TriageAction, classify, latest_per_conversation};

/// Counters for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TriageSummary {
    pub conversations: usize,
    pub skipped: usize,
    pub followups: usize,
    pub presented: usize,
    pub replies_sent: usize,
}

/// One triage run over the whole archive.
///
/// Conversations are processed strictly in sequence. The prompt and the
/// dispatcher may block on a human or a transport, which blocks the run —
/// there are no concurrent callers. Only source failures abort; every
/// dispatch or prompt failure is reported and the loop moves on.
pub struct TriagePipeline<'a> {
    config: &'a TriageConfig,
    contacts: &'a mut ContactBook,
    prompt: &'a mut dyn Prompt,
    dispatcher: &'a mut dyn ReplyDispatcher,
    announcer: Option<&'a dyn Announcer>,
}

impl<'a> TriagePipeline<'a> {
    pub fn new(
        config: &'a TriageConfig,
        contacts: &'a mut ContactBook,
        prompt: &'a mut dyn Prompt,
        dispatcher: &'a mut dyn ReplyDispatcher,
        announcer: Option<&'a dyn Announcer>,
    ) -> Self {
        Self {
            config,
            contacts,
            prompt,
            dispatcher,
            announcer,
        }
    }

    /// Load the three relations, select the latest message per
    /// conversation and triage each one.
    pub fn run(&mut self, source: &dyn MessageSource) -> Result<TriageSummary> {
        let messages = source.messages()?;
        let handles = source.handles()?;
        let links = source.chat_links()?;

        let latest = latest_per_conversation(&messages, &handles, &links);
        info!(
            conversations = latest.len(),
            messages = messages.len(),
            "Latest message selected per conversation"
        );

        let mut summary = TriageSummary {
            conversations: latest.len(),
            ..TriageSummary::default()
        };
        for view in &latest {
            self.triage_one(view, &mut summary);
        }
        Ok(summary)
    }

    fn triage_one(&mut self, view: &ConversationView, summary: &mut TriageSummary) {
        let text = view.text_or_empty();
        let action = classify(view);
        debug!(
            chat_id = view.chat_id,
            action = action.label(),
            "Conversation classified"
        );

        // Skipped rows never touch a collaborator; the sender of a skipped
        // conversation is not resolved either.
        match action {
            TriageAction::Skip { reason } => {
                debug!(chat_id = view.chat_id, reason = ?reason, "Conversation skipped");
                summary.skipped += 1;
            }
            TriageAction::FlagForFollowup => {
                summary.followups += 1;
                let sender = self.resolve_sender(view, text);
                println!(
                    "{}",
                    boxed_notice(
                        &format!(
                            "Seems like you asked a question to {sender}! You should poke them!"
                        ),
                        text,
                        self.config.notice_width,
                    )
                );
                println!("Poke?");
                self.offer_reply(view, summary);
            }
            TriageAction::PresentAndReply => {
                summary.presented += 1;
                let sender = self.resolve_sender(view, text);
                if let Some(announcer) = self.announcer
                    && let Err(e) = announcer.announce(&format!("You have messages from {sender}."))
                {
                    warn!(error = %e, "Announcement failed");
                }
                println!("{}", boxed_notice(&sender, text, self.config.notice_width));
                self.offer_reply(view, summary);
            }
        }
    }

    /// Resolve the sender of a conversation to a display name.
    ///
    /// Messages without a handle reference have no address and resolve to
    /// an empty sender. A failed resolution falls back to the raw address
    /// so the run keeps moving.
    fn resolve_sender(&mut self, view: &ConversationView, text: &str) -> String {
        let Some(address) = view.address.as_deref() else {
            return String::new();
        };
        match self.contacts.resolve(address, text, &mut *self.prompt) {
            Ok(name) => name,
            Err(e) => {
                warn!(address, error = %e, "Sender resolution failed; using raw address");
                address.to_string()
            }
        }
    }

    /// Ask for a reply and dispatch it to the conversation's address.
    fn offer_reply(&mut self, view: &ConversationView, summary: &mut TriageSummary) {
        let Some(address) = view.address.as_deref() else {
            warn!(chat_id = view.chat_id, "Conversation has no address; cannot reply");
            return;
        };
        let reply = match self.prompt.ask("Type your message: ") {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Reply prompt failed; skipping reply");
                return;
            }
        };
        match check_outgoing(&reply) {
            Ok(OutgoingCheck::Declined) => {
                info!("Did not type a message, skipping reply");
            }
            Err(e) => {
                warn!(error = %e, "Reply rejected before dispatch");
            }
            Ok(OutgoingCheck::Send) => match self.dispatcher.send(address, reply.trim()) {
                Ok(()) => {
                    summary.replies_sent += 1;
                }
                Err(e) => {
                    warn!(address, error = %e, "Reply dispatch failed; continuing");
                }
            },
        }
    }
}
