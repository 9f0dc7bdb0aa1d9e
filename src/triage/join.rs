//! Join & aggregation engine — one latest-message view per conversation.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::source::{ChatLinkRow, HandleRow, MessageRow};

/// The latest message of one conversation, joined with its sender address
/// and derived date parts.
#[derive(Debug, Clone)]
pub struct ConversationView {
    pub chat_id: i64,
    pub message_id: i64,
    /// Raw text of the latest message (the archive allows NULL).
    pub text: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub month: u32,
    pub year: i32,
    /// Sender address, absent when the message carries no handle reference.
    pub address: Option<String>,
    pub outgoing: bool,
}

impl ConversationView {
    /// Text of the latest message, with NULL read as empty.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Reduce the three relations to exactly one view per conversation id
/// present in the links.
///
/// Pure function of its inputs: left-joins messages to handles (a missing
/// handle still participates, with no address), drops messages without a
/// conversation membership, stable-sorts ascending by raw timestamp and
/// keeps the last row per conversation. Equal timestamps resolve to the
/// later input row, deterministically. Output preserves the order in which
/// conversations first appear in the sorted stream.
pub fn latest_per_conversation(
    messages: &[MessageRow],
    handles: &[HandleRow],
    links: &[ChatLinkRow],
) -> Vec<ConversationView> {
    let addresses: HashMap<i64, &str> = handles
        .iter()
        .map(|h| (h.handle_id, h.address.as_str()))
        .collect();

    // Each message id has at most one active membership; the first link
    // wins when the archive carries duplicates.
    let mut chat_of: HashMap<i64, i64> = HashMap::new();
    for link in links {
        chat_of.entry(link.message_id).or_insert(link.chat_id);
    }

    let mut joined: Vec<(&MessageRow, i64)> = messages
        .iter()
        .filter_map(|m| chat_of.get(&m.message_id).map(|chat| (m, *chat)))
        .collect();

    // sort_by_key is stable, so ties keep input row order.
    joined.sort_by_key(|(m, _)| m.date);

    let mut slot: HashMap<i64, usize> = HashMap::new();
    let mut latest: Vec<(&MessageRow, i64)> = Vec::new();
    for (message, chat_id) in joined {
        match slot.get(&chat_id) {
            Some(&i) => latest[i] = (message, chat_id),
            None => {
                slot.insert(chat_id, latest.len());
                latest.push((message, chat_id));
            }
        }
    }

    latest
        .into_iter()
        .map(|(m, chat_id)| {
            let timestamp = m.timestamp();
            ConversationView {
                chat_id,
                message_id: m.message_id,
                text: m.text.clone(),
                timestamp,
                date: timestamp.date_naive(),
                month: timestamp.month(),
                year: timestamp.year(),
                address: m
                    .handle_id
                    .and_then(|h| addresses.get(&h).map(|a| a.to_string())),
                outgoing: m.outgoing,
            }
        })
        .collect()
}
