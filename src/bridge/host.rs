use std::io::Write;

use anyhow::{Context, Result};

use super::message::HostMessage;

/// One-way channel to the process embedding the wizard.
pub trait HostBridge {
    fn post_message(&mut self, message: &HostMessage) -> Result<()>;
}

impl<B: HostBridge + ?Sized> HostBridge for Box<B> {
    fn post_message(&mut self, message: &HostMessage) -> Result<()> {
        (**self).post_message(message)
    }
}

/// Keeps every posted message in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    messages: Vec<HostMessage>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[HostMessage] {
        &self.messages
    }

    pub fn take(&mut self) -> Vec<HostMessage> {
        std::mem::take(&mut self.messages)
    }
}

impl HostBridge for RecordingBridge {
    fn post_message(&mut self, message: &HostMessage) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }
}

/// Writes each message as a single line of JSON.
#[derive(Debug)]
pub struct JsonLinesBridge<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesBridge<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HostBridge for JsonLinesBridge<W> {
    fn post_message(&mut self, message: &HostMessage) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)
            .with_context(|| format!("failed to encode `{}` message", message.id))?;
        self.writer
            .write_all(b"\n")
            .and_then(|_| self.writer.flush())
            .context("failed to write host message")
    }
}
