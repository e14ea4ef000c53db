//! Scripted companion chat for the boundaries intro lesson.
//!
//! A script is a fixed sequence of companion lines and questions. The
//! session is a small state machine: it walks the script, hands each line
//! out with its reveal delay, blocks on questions until the user replies,
//! and acknowledges every reply with the same line before moving on. The
//! driver (CLI or test) owns the actual sleeping; the session itself never
//! waits, so it stays trivially testable.

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

/// Who said a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Companion,
    User,
}

/// One line of the transcript, in arrival order.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub order: u32,
}

/// One step of a script.
#[derive(Debug, Clone, Copy)]
pub enum ChatStep {
    /// A companion line shown after a typing delay.
    Narration {
        text: &'static str,
        reveal_delay_ms: u64,
    },
    /// A companion question; the session blocks until a reply arrives.
    Question { text: &'static str },
}

/// Typing delay before a question is shown.
const QUESTION_REVEAL_MS: u64 = 1000;

/// Acknowledgement line sent after every user reply.
pub const REPLY_ACK: &str = "Thank you for sharing. Let's keep going in this format 💜";
const REPLY_ACK_DELAY_MS: u64 = 1500;

/// Intro script for the first boundaries lesson.
pub fn boundaries_intro_script() -> &'static [ChatStep] {
    &[
        ChatStep::Narration {
            text: "Hi! I'm Katya 💜",
            reveal_delay_ms: 600,
        },
        ChatStep::Narration {
            text: "Today we begin the first lesson about personal boundaries.",
            reveal_delay_ms: 1800,
        },
        ChatStep::Narration {
            text: "This is a conversational format. I'll ask questions and you share your thoughts.",
            reveal_delay_ms: 2200,
        },
        ChatStep::Question {
            text: "How do boundaries feel to you? What does it mean to you to say \"no\"?",
        },
    ]
}

/// What the driver should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Sleep for `delay_ms`, then show `text` as a companion line.
    Reveal { text: String, delay_ms: u64 },
    /// Block until the user replies.
    AwaitReply,
    Finished,
}

/// Walks a script, recording the transcript as lines are revealed.
pub struct ChatSession {
    script: &'static [ChatStep],
    cursor: usize,
    awaiting_reply: bool,
    /// Pending acknowledgement of the last reply, emitted before advancing.
    ack_pending: bool,
    transcript: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(script: &'static [ChatStep]) -> Self {
        Self {
            script,
            cursor: 0,
            awaiting_reply: false,
            ack_pending: false,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.len() && !self.awaiting_reply && !self.ack_pending
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    fn record(&mut self, text: &str, sender: Sender) {
        let order = self.transcript.len() as u32;
        self.transcript.push(ChatMessage {
            text: text.to_string(),
            sender,
            order,
        });
    }

    /// The next action the driver should take. Revealed companion lines are
    /// appended to the transcript here, so calling this again before acting
    /// would duplicate them; drivers call it once per step.
    pub fn next_action(&mut self) -> ChatAction {
        if self.awaiting_reply {
            return ChatAction::AwaitReply;
        }
        if self.ack_pending {
            self.ack_pending = false;
            self.record(REPLY_ACK, Sender::Companion);
            return ChatAction::Reveal {
                text: REPLY_ACK.to_string(),
                delay_ms: REPLY_ACK_DELAY_MS,
            };
        }
        match self.script.get(self.cursor) {
            Some(ChatStep::Narration {
                text,
                reveal_delay_ms,
            }) => {
                self.cursor += 1;
                self.record(text, Sender::Companion);
                ChatAction::Reveal {
                    text: (*text).to_string(),
                    delay_ms: *reveal_delay_ms,
                }
            }
            Some(ChatStep::Question { text }) => {
                self.cursor += 1;
                self.awaiting_reply = true;
                self.record(text, Sender::Companion);
                ChatAction::Reveal {
                    text: (*text).to_string(),
                    delay_ms: QUESTION_REVEAL_MS,
                }
            }
            None => ChatAction::Finished,
        }
    }

    /// Hand in the user's reply to the pending question. Returns `None`
    /// when no question is pending.
    pub fn submit_reply(&mut self, text: &str) -> Option<ChatAction> {
        if !self.awaiting_reply {
            return None;
        }
        self.awaiting_reply = false;
        self.ack_pending = true;
        self.record(text, Sender::User);
        Some(self.next_action())
    }
}

/// Events emitted while driving a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Companion(String),
    AwaitingReply,
    Finished,
}

/// Drive the session forward, sleeping out reveal delays, until it either
/// needs a user reply or runs out of script. Emits one event per revealed
/// line so the caller can render as lines land.
pub async fn run_until_blocked(
    session: &mut ChatSession,
    events: &mpsc::Sender<ChatEvent>,
) -> Result<(), mpsc::error::SendError<ChatEvent>> {
    loop {
        match session.next_action() {
            ChatAction::Reveal { text, delay_ms } => {
                sleep(Duration::from_millis(delay_ms)).await;
                events.send(ChatEvent::Companion(text)).await?;
            }
            ChatAction::AwaitReply => {
                events.send(ChatEvent::AwaitingReply).await?;
                return Ok(());
            }
            ChatAction::Finished => {
                events.send(ChatEvent::Finished).await?;
                return Ok(());
            }
        }
    }
}
