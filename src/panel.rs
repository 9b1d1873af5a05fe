//! One-request-at-a-time state machine shared by every tool panel
//!
//! `Idle -> Awaiting` on submit, `Awaiting -> Ready | Failed` when the spawned call finishes.
//! A submit while `Awaiting` does nothing and spawns nothing. Failures only ever expose the
//! panel's fixed fallback message; the underlying error goes to the log.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus<T> {
    Idle,
    Awaiting,
    Ready(T),
    Failed(&'static str),
}

pub struct Panel<T> {
    name: &'static str,
    fallback: &'static str,
    status: PanelStatus<T>,
    task: Option<JoinHandle<anyhow::Result<T>>>,
}

impl<T: Send + 'static> Panel<T> {
    pub fn new(name: &'static str, fallback: &'static str) -> Self {
        Self {
            name,
            fallback,
            status: PanelStatus::Idle,
            task: None,
        }
    }

    pub fn status(&self) -> &PanelStatus<T> {
        &self.status
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.status, PanelStatus::Awaiting)
    }

    pub fn result(&self) -> Option<&T> {
        match &self.status {
            PanelStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&'static str> {
        match self.status {
            PanelStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Start `call` in the background. Returns false, without spawning, if a call is
    /// already in flight.
    pub fn submit<F, E>(&mut self, call: F) -> bool
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        let fallback = self.fallback;
        self.submit_with_fallback(fallback, call)
    }

    /// Like `submit`, with a fallback message specific to this request
    pub fn submit_with_fallback<F, E>(&mut self, fallback: &'static str, call: F) -> bool
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        if self.is_awaiting() {
            return false;
        }

        self.fallback = fallback;
        self.status = PanelStatus::Awaiting;
        self.task = Some(tokio::spawn(async move { call.await.map_err(Into::into) }));
        true
    }

    /// Collect the result if the background call has finished. Returns true on a transition.
    pub async fn poll(&mut self) -> bool {
        let finished = self.task.as_ref().is_some_and(|task| task.is_finished());
        if !finished {
            return false;
        }

        let Some(task) = self.task.take() else {
            return false;
        };
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(anyhow::Error::from(join_error)),
        };
        self.resolve(outcome);
        true
    }

    /// Wait for the in-flight call, if any, and apply its outcome.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(anyhow::Error::from(join_error)),
            };
            self.resolve(outcome);
        }
    }

    pub fn resolve(&mut self, outcome: anyhow::Result<T>) {
        if !self.is_awaiting() {
            return;
        }
        self.status = match outcome {
            Ok(value) => PanelStatus::Ready(value),
            Err(err) => {
                warn!(panel = self.name, error = %err, "request failed");
                PanelStatus::Failed(self.fallback)
            }
        };
    }

    /// Abort any in-flight call and clear the result.
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.status = PanelStatus::Idle;
    }
}
