use anyhow::Context;

use chat_triage::config::TriageConfig;
use chat_triage::dispatch::{Announcer, FinderRevealer, OsaScriptDispatcher, SayAnnouncer, StoreRevealer};
use chat_triage::identity::ContactBook;
use chat_triage::pipeline::TriagePipeline;
use chat_triage::prompt::StdinPrompt;
use chat_triage::source::ChatDb;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = TriageConfig::default();
    if let Ok(path) = std::env::var("CHAT_TRIAGE_ARCHIVE") {
        config.archive_path = path.into();
    }
    if let Ok(path) = std::env::var("CHAT_TRIAGE_CONTACTS") {
        config.contacts_path = path.into();
    }
    if let Ok(width) = std::env::var("CHAT_TRIAGE_WIDTH") {
        config.notice_width = width.parse().unwrap_or(config.notice_width);
    }
    config.announce_voice = std::env::var("CHAT_TRIAGE_VOICE").ok();

    eprintln!("chat-triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Archive:  {}", config.archive_path.display());
    eprintln!("   Contacts: {}", config.contacts_path.display());

    // The archive lives in a hidden directory; failing to reveal it is not
    // fatal — opening the archive decides that.
    if let Err(e) = FinderRevealer.reveal() {
        tracing::warn!(error = %e, "Could not reveal the hidden archive");
    }

    let source = ChatDb::open(&config.archive_path).with_context(|| {
        format!(
            "message archive unavailable at {}",
            config.archive_path.display()
        )
    })?;

    let mut contacts = ContactBook::load(&config.contacts_path).with_context(|| {
        format!("contact book unavailable at {}", config.contacts_path.display())
    })?;

    let mut prompt = StdinPrompt;
    let mut dispatcher = OsaScriptDispatcher::new("sendMessage.applescript");
    let announcer = config.announce_voice.clone().map(SayAnnouncer::new);

    println!("Please respond to the following messages!");

    let mut pipeline = TriagePipeline::new(
        &config,
        &mut contacts,
        &mut prompt,
        &mut dispatcher,
        announcer.as_ref().map(|a| a as &dyn Announcer),
    );
    let summary = pipeline.run(&source)?;

    eprintln!(
        "Done: {} conversations — {} presented, {} follow-ups, {} skipped, {} replies sent",
        summary.conversations,
        summary.presented,
        summary.followups,
        summary.skipped,
        summary.replies_sent
    );
    Ok(())
}
