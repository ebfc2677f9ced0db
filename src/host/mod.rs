//! Host boundary - pushes entry updates and run metadata to UI instances.
//!
//! Each UI instance calls [`LogHost::register`] and gets a [`Subscription`].
//! The host owns the decoder and tree builder; after every batch of lines it
//! sends one [`HostEvent::Entries`] (when entries changed) and metadata
//! events to every live subscription. Sending never blocks; subscriptions
//! whose receiver was dropped are pruned on the next send.
//!
//! A subscription drains its events into a [`HostHandler`] with
//! [`Subscription::dispatch`], which is where the three host callbacks land.

use crate::decoder::MessageDecoder;
use crate::model::{RunIdsAndLabel, RunInfo};
use crate::treebuild::{BuildOptions, TreeBuilder};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::{debug, info, warn};

pub use crate::treebuild::EntriesUpdate;

/// One message from host to UI.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// New entry sequence.
    Entries(EntriesUpdate),
    /// New run info.
    RunInfo(RunInfo),
    /// New run ids.
    RunIdsAndLabel(RunIdsAndLabel),
}

/// Receiver side of the three host callbacks.
pub trait HostHandler {
    /// The entry sequence changed.
    fn on_entries(&mut self, update: EntriesUpdate);

    /// Run info changed.
    fn on_run_info(&mut self, run_info: RunInfo);

    /// Run ids changed.
    fn on_run_ids_and_label(&mut self, run_ids_and_label: RunIdsAndLabel);
}

/// A registered UI instance's end of the host channel.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<HostEvent>,
}

impl Subscription {
    /// Next pending event, without blocking.
    pub fn try_next(&self) -> Option<HostEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Deliver every pending event to `handler`. Returns how many were delivered.
    pub fn dispatch<H: HostHandler + ?Sized>(&self, handler: &mut H) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.try_next() {
            match event {
                HostEvent::Entries(update) => handler.on_entries(update),
                HostEvent::RunInfo(run_info) => handler.on_run_info(run_info),
                HostEvent::RunIdsAndLabel(ids) => handler.on_run_ids_and_label(ids),
            }
            delivered += 1;
        }
        delivered
    }
}

/// Counts from one [`LogHost::feed_lines`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Lines that decoded into a message.
    pub decoded: usize,
    /// Lines skipped because they failed to decode.
    pub skipped: usize,
}

/// Producer side: decodes run-log lines and fans updates out.
#[derive(Debug, Default)]
pub struct LogHost {
    decoder: MessageDecoder,
    builder: TreeBuilder,
    subscribers: Vec<Sender<HostEvent>>,
    lines_seen: usize,
}

impl LogHost {
    /// Host with default build options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with explicit build options.
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            builder: TreeBuilder::with_options(options),
            ..Self::default()
        }
    }

    /// Register a UI instance.
    ///
    /// A late subscriber immediately receives the current state.
    pub fn register(&mut self) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        // The receiver is still held here, so these sends cannot fail.
        if !self.builder.entries().is_empty() {
            sender
                .send(HostEvent::Entries(self.builder.snapshot()))
                .ok();
        }
        if self.lines_seen > 0 {
            sender
                .send(HostEvent::RunInfo(self.builder.run_info().clone()))
                .ok();
            sender
                .send(HostEvent::RunIdsAndLabel(
                    self.builder.run_ids_and_label().clone(),
                ))
                .ok();
        }
        self.subscribers.push(sender);
        debug!(subscribers = self.subscribers.len(), "subscription registered");
        Subscription { receiver }
    }

    /// Number of live subscriptions (as of the last send).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Decode and apply a batch of lines, then publish what changed.
    ///
    /// Lines that fail to decode are logged and skipped.
    pub fn feed_lines<I, S>(&mut self, lines: I) -> FeedSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = FeedSummary::default();
        for line in lines {
            self.lines_seen += 1;
            match self.decoder.decode_line(self.lines_seen, line.as_ref()) {
                Ok(Some(msg)) => {
                    self.builder.apply(&msg);
                    summary.decoded += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(line = e.line(), error = %e, "skipping undecodable line");
                    summary.skipped += 1;
                }
            }
        }
        self.publish();
        summary
    }

    /// Send pending changes to every subscription.
    pub fn publish(&mut self) {
        if let Some(update) = self.builder.take_update() {
            self.broadcast(HostEvent::Entries(update));
        }
        if let Some(run_info) = self.builder.take_run_info() {
            self.broadcast(HostEvent::RunInfo(run_info));
        }
        if let Some(ids) = self.builder.take_run_ids_and_label() {
            self.broadcast(HostEvent::RunIdsAndLabel(ids));
        }
    }

    fn broadcast(&mut self, event: HostEvent) {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            info!(pruned, "dropped detached subscriptions");
        }
    }
}
