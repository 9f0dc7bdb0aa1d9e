//! End-to-end triage run over a seeded archive file with scripted
//! collaborators: the prompt answers from a script, the dispatcher records
//! sends, the contact book lives in a temp directory.

use std::path::Path;

use chat_triage::config::TriageConfig;
use chat_triage::dispatch::ReplyDispatcher;
use chat_triage::error::DispatchError;
use chat_triage::identity::ContactBook;
use chat_triage::pipeline::TriagePipeline;
use chat_triage::prompt::ScriptedPrompt;
use chat_triage::source::ChatDb;

#[derive(Default)]
struct RecordingDispatcher {
    sent: Vec<(String, String)>,
}

impl ReplyDispatcher for RecordingDispatcher {
    fn send(&mut self, address: &str, text: &str) -> Result<(), DispatchError> {
        self.sent.push((address.to_string(), text.to_string()));
        Ok(())
    }
}

/// Seed a chat.db-shaped archive:
/// - chat 10: inbound question from an unknown sender (earliest)
/// - chat 20: outgoing question to a known sender (needs a poke)
/// - chat 30: inbound "ok" from the known sender (too short, skipped)
fn seed_archive(path: &Path) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE message (
            ROWID INTEGER PRIMARY KEY,
            text TEXT,
            date INTEGER NOT NULL,
            handle_id INTEGER,
            is_sent INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE handle (ROWID INTEGER PRIMARY KEY, id TEXT NOT NULL);
        CREATE TABLE chat_message_join (chat_id INTEGER NOT NULL, message_id INTEGER NOT NULL);

        INSERT INTO handle VALUES (1, '+15551234567');
        INSERT INTO handle VALUES (2, '+15559990000');

        INSERT INTO message VALUES (1, 'hey', 100, 1, 0);
        INSERT INTO message VALUES (2, 'Can we meet tomorrow at noon?', 200, 1, 0);
        INSERT INTO message VALUES (3, 'Are you coming?', 300, 2, 1);
        INSERT INTO message VALUES (4, 'ok', 400, 2, 0);

        INSERT INTO chat_message_join VALUES (10, 1);
        INSERT INTO chat_message_join VALUES (10, 2);
        INSERT INTO chat_message_join VALUES (20, 3);
        INSERT INTO chat_message_join VALUES (30, 4);",
    )
    .unwrap();
}

#[test]
fn full_run_triages_resolves_and_dispatches() {
    let tmp = tempfile::tempdir().unwrap();
    let archive_path = tmp.path().join("chat.db");
    let contacts_path = tmp.path().join("contacts");
    seed_archive(&archive_path);
    std::fs::write(&contacts_path, "+15559990000,Bob\n").unwrap();

    let config = TriageConfig {
        archive_path: archive_path.clone(),
        contacts_path: contacts_path.clone(),
        notice_width: 60,
        announce_voice: None,
    };

    let source = ChatDb::open(&config.archive_path).unwrap();
    let mut contacts = ContactBook::load(&config.contacts_path).unwrap();
    // Conversations run in timestamp order: chat 10 (name the sender, then
    // reply), chat 20 (decline the poke), chat 30 (skipped, no prompts).
    let mut prompt = ScriptedPrompt::new(["Jane", "Sure, noon works!", ""]);
    let mut dispatcher = RecordingDispatcher::default();

    let summary = TriagePipeline::new(&config, &mut contacts, &mut prompt, &mut dispatcher, None)
        .run(&source)
        .unwrap();

    assert_eq!(summary.conversations, 3);
    assert_eq!(summary.presented, 1);
    assert_eq!(summary.followups, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.replies_sent, 1);

    assert_eq!(prompt.questions.len(), 3);
    assert!(prompt.questions[0].contains("Who is [+15551234567]?"));
    assert!(prompt.questions[0].contains("Can we meet tomorrow at noon?"));
    assert_eq!(prompt.questions[1], "Type your message: ");
    assert_eq!(prompt.questions[2], "Type your message: ");

    assert_eq!(
        dispatcher.sent,
        vec![("+15551234567".to_string(), "Sure, noon works!".to_string())]
    );

    // The new mapping was appended to the existing book.
    let book = std::fs::read_to_string(&contacts_path).unwrap();
    assert_eq!(book, "+15559990000,Bob\n+15551234567,Jane\n");
}

#[test]
fn second_run_never_prompts_for_known_senders() {
    let tmp = tempfile::tempdir().unwrap();
    let archive_path = tmp.path().join("chat.db");
    let contacts_path = tmp.path().join("contacts");
    seed_archive(&archive_path);
    std::fs::write(&contacts_path, "+15559990000,Bob\n").unwrap();

    let config = TriageConfig {
        archive_path: archive_path.clone(),
        contacts_path: contacts_path.clone(),
        notice_width: 60,
        announce_voice: None,
    };

    // First run names the unknown sender.
    {
        let source = ChatDb::open(&config.archive_path).unwrap();
        let mut contacts = ContactBook::load(&config.contacts_path).unwrap();
        let mut prompt = ScriptedPrompt::new(["Jane", "", ""]);
        let mut dispatcher = RecordingDispatcher::default();
        TriagePipeline::new(&config, &mut contacts, &mut prompt, &mut dispatcher, None)
            .run(&source)
            .unwrap();
    }

    // Second run resolves everyone from the book: only reply prompts left.
    let source = ChatDb::open(&config.archive_path).unwrap();
    let mut contacts = ContactBook::load(&config.contacts_path).unwrap();
    let mut prompt = ScriptedPrompt::new(["", ""]);
    let mut dispatcher = RecordingDispatcher::default();
    TriagePipeline::new(&config, &mut contacts, &mut prompt, &mut dispatcher, None)
        .run(&source)
        .unwrap();

    assert!(prompt.questions.iter().all(|q| q == "Type your message: "));
}

#[test]
fn missing_archive_is_fatal_with_path_in_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = ChatDb::open(tmp.path().join("absent.db")).unwrap_err();
    assert!(err.to_string().contains("absent.db"));
}

#[test]
fn empty_archive_completes_without_collaborators() {
    let tmp = tempfile::tempdir().unwrap();
    let archive_path = tmp.path().join("chat.db");
    let contacts_path = tmp.path().join("contacts");
    let conn = rusqlite::Connection::open(&archive_path).unwrap();
    conn.execute_batch(
        "CREATE TABLE message (
            ROWID INTEGER PRIMARY KEY,
            text TEXT,
            date INTEGER NOT NULL,
            handle_id INTEGER,
            is_sent INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE handle (ROWID INTEGER PRIMARY KEY, id TEXT NOT NULL);
        CREATE TABLE chat_message_join (chat_id INTEGER NOT NULL, message_id INTEGER NOT NULL);",
    )
    .unwrap();
    drop(conn);

    let config = TriageConfig {
        archive_path: archive_path.clone(),
        contacts_path: contacts_path.clone(),
        notice_width: 60,
        announce_voice: None,
    };

    let source = ChatDb::open(&config.archive_path).unwrap();
    let mut contacts = ContactBook::load(&config.contacts_path).unwrap();
    let mut prompt = ScriptedPrompt::default();
    let mut dispatcher = RecordingDispatcher::default();

    let summary = TriagePipeline::new(&config, &mut contacts, &mut prompt, &mut dispatcher, None)
        .run(&source)
        .unwrap();

    assert_eq!(summary.conversations, 0);
    assert!(prompt.questions.is_empty());
    assert!(dispatcher.sent.is_empty());
}
