//! Interactive question-answering session.
//!
//! Owns the store handle and the language-model client for the lifetime of
//! a run. Each question runs retrieval → assembly → generation behind a
//! per-question fault boundary: one bad question never kills the session.
//! The store session is released exactly once, on every exit path.

use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{error, info, warn};

use crate::answer::LlmClient;
use crate::config::Config;
use crate::context;
use crate::models::Answer;
use crate::retrieve;
use crate::store::{DocumentStore, HttpStore};

/// One normalized line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Question(String),
    /// Blank line; the loop continues without processing.
    Empty,
    /// Exit keyword or end of input; the session closes.
    Exit,
}

/// Normalize a read line: `None` means end of input.
pub fn parse_input(line: Option<&str>) -> Input {
    let Some(raw) = line else {
        return Input::Exit;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if is_exit_keyword(trimmed) {
        return Input::Exit;
    }

    Input::Question(trimmed.to_string())
}

fn is_exit_keyword(word: &str) -> bool {
    matches!(word.to_lowercase().as_str(), "quit" | "exit" | "q" | "退出")
}

/// A live question-answering session over one open store handle.
pub struct Session {
    store: Box<dyn DocumentStore>,
    llm: LlmClient,
    target: Option<String>,
    limit: usize,
}

impl Session {
    pub fn new(
        store: Box<dyn DocumentStore>,
        llm: LlmClient,
        target: Option<String>,
        limit: usize,
    ) -> Self {
        Self {
            store,
            llm,
            target,
            limit,
        }
    }

    /// Answer one question: retrieve, assemble, generate, display.
    ///
    /// A retrieval failure propagates to the caller. A generation failure
    /// is reported to the user and is not an error here — the session
    /// carries on either way.
    pub async fn ask(&self, question: &str) -> Result<Option<Answer>> {
        info!(%question, "processing question");

        let results = retrieve::find(
            self.store.as_ref(),
            question,
            self.target.as_deref(),
            self.limit,
        )
        .await?;

        println!("\nmatched resources:");
        for r in &results.resources {
            println!("- {} (score={:.4})", r.uri, r.score);
        }

        let context = context::build(&results);

        match self.llm.answer(question, &context).await {
            Ok(answer) => {
                println!("\n{}", "=".repeat(50));
                println!("answer:");
                println!("{}", "=".repeat(50));
                println!("{}", answer.text);
                Ok(Some(answer))
            }
            Err(e) => {
                error!(error = %e, "generation failed");
                println!("generation failed: {}", e);
                Ok(None)
            }
        }
    }

    /// Release the store session. Called exactly once per session; a close
    /// failure is logged, never propagated.
    pub async fn close(self) {
        if let Err(e) = self.store.close().await {
            warn!(error = %e, "store close failed");
        } else {
            info!("session ended");
        }
    }
}

/// CLI entry point for `grounded ask` — one question, then exit.
pub async fn run_ask(
    config: &Config,
    question: &str,
    target: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let llm = LlmClient::new(&config.llm)?;
    let store = HttpStore::open(&config.store).await?;
    let session = Session::new(
        Box::new(store),
        llm,
        target,
        limit.unwrap_or(config.retrieval.limit),
    );

    println!("question: {}", question);
    println!("{}", "-".repeat(50));

    // Per-question failures are informational; the run still exits cleanly.
    if let Err(e) = session.ask(question).await {
        error!(error = %format!("{e:#}"), "question failed");
        println!("failed to answer: {e:#}");
    }

    session.close().await;
    Ok(())
}

/// CLI entry point for `grounded chat` — the interactive loop.
pub async fn run_chat(config: &Config, target: Option<String>) -> Result<()> {
    let llm = LlmClient::new(&config.llm)?;
    let store = HttpStore::open(&config.store).await?;
    let session = Session::new(Box::new(store), llm, target, config.retrieval.limit);

    println!("{}", "=".repeat(50));
    println!("grounded — document question answering");
    println!("type a question, or 'quit' / 'exit' to leave");
    println!("{}", "=".repeat(50));

    let lines = BufReader::new(tokio::io::stdin()).lines();
    chat_loop(&session, lines).await;

    session.close().await;
    Ok(())
}

/// Drive the read/answer loop until the input ends, an exit keyword
/// arrives, or the terminal goes away.
///
/// Never returns an error: every per-iteration failure is reported and
/// swallowed, and a dead stdout ends the loop, so the caller always
/// reaches its single `close`.
pub async fn chat_loop<R: AsyncBufRead + Unpin>(session: &Session, mut lines: Lines<R>) {
    loop {
        println!("\n{}", "-".repeat(50));
        print!("question> ");
        if let Err(e) = std::io::stdout().flush() {
            // Broken pipe; nobody is reading answers anymore.
            warn!(error = %e, "could not flush prompt");
            break;
        }

        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                info!("interrupted");
                break;
            }
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(line) => line,
            // Undecodable input is a recoverable per-iteration error.
            Err(e) => {
                warn!(error = %e, "could not read input");
                println!("could not read input: {}", e);
                continue;
            }
        };

        match parse_input(line.as_deref()) {
            Input::Empty => continue,
            Input::Exit => {
                println!("bye");
                break;
            }
            Input::Question(question) => {
                if let Err(e) = session.ask(&question).await {
                    error!(error = %format!("{e:#}"), "question failed");
                    println!("error while answering: {e:#}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_is_exit() {
        assert_eq!(parse_input(None), Input::Exit);
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_input(Some("")), Input::Empty);
        assert_eq!(parse_input(Some("   \t ")), Input::Empty);
    }

    #[test]
    fn exit_keywords_are_case_insensitive() {
        for word in ["quit", "QUIT", "exit", "Exit", "q", "Q", "退出"] {
            assert_eq!(parse_input(Some(word)), Input::Exit, "word: {}", word);
        }
    }

    #[test]
    fn questions_are_trimmed() {
        assert_eq!(
            parse_input(Some("  申购规则是什么？  ")),
            Input::Question("申购规则是什么？".to_string())
        );
    }

    #[test]
    fn exit_keyword_inside_a_sentence_is_a_question() {
        assert_eq!(
            parse_input(Some("how do I exit a position?")),
            Input::Question("how do I exit a position?".to_string())
        );
    }
}
