//! Human-prompt collaborator.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Blocking question-and-answer seam.
///
/// The pipeline asks through this trait whenever it needs a human: naming
/// an unknown sender, or composing a reply. Production uses stdin; tests
/// inject scripted answers.
pub trait Prompt {
    /// Ask one question and return the raw answer line.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Prompts on stderr, reads one answer line from stdin.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        eprint!("{question}");
        io::stderr().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Deterministic prompt double: pops canned answers in order and records
/// every question asked. Errors once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    /// Questions asked so far, in order.
    pub questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left")
        })
    }
}
