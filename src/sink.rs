//! Conduits between the scanner and its consumer.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::JoinHandle;

use crate::token::{Token, TokenKind};

/// The consumer hung up; the producer should stop scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("token consumer disconnected")]
pub struct Disconnected;

/// Producer side of a token stream.
pub trait TokenSink {
    /// Deliver one token, in emission order.
    ///
    /// May block while the sink is full.
    fn push(&mut self, token: Token) -> Result<(), Disconnected>;
}

impl TokenSink for VecDeque<Token> {
    fn push(&mut self, token: Token) -> Result<(), Disconnected> {
        self.push_back(token);
        Ok(())
    }
}

impl TokenSink for Vec<Token> {
    fn push(&mut self, token: Token) -> Result<(), Disconnected> {
        Vec::push(self, token);
        Ok(())
    }
}

/// Bounded sink feeding a `TokenReceiver` on another thread.
///
/// Dropping it closes the stream.
#[derive(Debug)]
pub struct ChannelSink {
    tx: SyncSender<Token>,
}

impl TokenSink for ChannelSink {
    fn push(&mut self, token: Token) -> Result<(), Disconnected> {
        self.tx.send(token).map_err(|_| Disconnected)
    }
}

/// Create a bounded channel holding at most `capacity` pending tokens.
#[must_use]
pub fn channel(capacity: NonZeroUsize) -> (ChannelSink, Receiver<Token>) {
    let (tx, rx) = mpsc::sync_channel(capacity.get());
    (ChannelSink { tx }, rx)
}

/// Consumer side of a scanner running on its own thread.
///
/// Dropping the receiver hangs up the channel and waits for the
/// producer to notice, so the scanning thread never outlives it.
#[derive(Debug)]
pub struct TokenReceiver {
    rx: Option<Receiver<Token>>,
    producer: Option<JoinHandle<()>>,
    input_len: usize,
}

impl TokenReceiver {
    pub(crate) const fn new(rx: Receiver<Token>, producer: JoinHandle<()>, input_len: usize) -> Self {
        Self {
            rx: Some(rx),
            producer: Some(producer),
            input_len,
        }
    }

    /// Pull the next token, blocking until one is available.
    ///
    /// Once the stream is closed this keeps returning an
    /// `EndOfInput` token positioned at the end of the input.
    pub fn next_token(&mut self) -> Token {
        self.pull()
            .unwrap_or_else(|| Token::new(TokenKind::EndOfInput, self.input_len, ""))
    }

    /// Discard everything the producer still sends and wait for it
    /// to finish.
    pub fn drain(&mut self) {
        if let Some(rx) = &self.rx {
            let discarded = rx.iter().count();
            tracing::debug!(discarded, "drained token stream");
        }
        self.rx = None;
        self.join();
    }

    fn pull(&mut self) -> Option<Token> {
        let token = self.rx.as_ref()?.recv().ok();
        match &token {
            Some(t) if !t.is_error() => {}
            // Closed, or the error that precedes closure.
            _ => {
                self.rx = None;
                self.join();
            }
        }
        token
    }

    fn join(&mut self) {
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                tracing::warn!("scanner thread panicked");
            }
        }
    }
}

impl Iterator for TokenReceiver {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.pull()
    }
}

impl Drop for TokenReceiver {
    fn drop(&mut self) {
        self.rx = None;
        self.join();
    }
}
