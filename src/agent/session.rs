//! A conversation served by its own task.
//!
//! Requests queue on a channel and the task runs them one at a time, so
//! callers on different tasks can share a conversation without locking its
//! state.

use super::{Agent, AgentError, AgentResult, PendingIntent, TurnResponse};
use crate::conversation::domain::{AgentState, ExecutionId};
use mockable::Clock;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const QUEUE_CAPACITY: usize = 32;

type Reply<T> = oneshot::Sender<AgentResult<T>>;

enum Command {
    Message {
        input: String,
        cancel: CancellationToken,
        reply: Reply<TurnResponse>,
    },
    Detect {
        input: String,
        cancel: CancellationToken,
        reply: Reply<PendingIntent>,
    },
    Execute {
        execution_id: ExecutionId,
        cancel: CancellationToken,
        reply: Reply<TurnResponse>,
    },
    Snapshot {
        reply: oneshot::Sender<AgentState>,
    },
}

/// Cloneable handle to an agent running on its own task.
///
/// The task stops once every handle is dropped.
#[derive(Clone)]
pub struct AgentSession {
    commands: mpsc::Sender<Command>,
}

impl AgentSession {
    /// Moves `agent` onto a new task and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn<C>(agent: Agent<C>) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        let (commands, inbox) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(serve(agent, inbox));
        Self { commands }
    }

    /// Handles a user message. See [`Agent::handle_message_with`].
    ///
    /// # Errors
    ///
    /// Returns the turn's [`AgentError`], or [`AgentError::SessionClosed`]
    /// when the session task has stopped.
    pub async fn handle_message(
        &self,
        input: impl Into<String>,
        cancel: CancellationToken,
    ) -> AgentResult<TurnResponse> {
        let text = input.into();
        self.request(|reply| Command::Message {
            input: text,
            cancel,
            reply,
        })
        .await?
    }

    /// Stores a pending execution. See [`Agent::detect_intent_with`].
    ///
    /// # Errors
    ///
    /// Returns the classification's [`AgentError`], or
    /// [`AgentError::SessionClosed`] when the session task has stopped.
    pub async fn detect_intent(
        &self,
        input: impl Into<String>,
        cancel: CancellationToken,
    ) -> AgentResult<PendingIntent> {
        let text = input.into();
        self.request(|reply| Command::Detect {
            input: text,
            cancel,
            reply,
        })
        .await?
    }

    /// Runs the pending execution. See [`Agent::execute_pending_with`].
    ///
    /// # Errors
    ///
    /// Returns the turn's [`AgentError`], or [`AgentError::SessionClosed`]
    /// when the session task has stopped.
    pub async fn execute_pending(
        &self,
        execution_id: ExecutionId,
        cancel: CancellationToken,
    ) -> AgentResult<TurnResponse> {
        self.request(|reply| Command::Execute {
            execution_id,
            cancel,
            reply,
        })
        .await?
    }

    /// Returns a copy of the committed state.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SessionClosed`] when the session task has
    /// stopped.
    pub async fn snapshot(&self) -> AgentResult<AgentState> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> AgentResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| AgentError::SessionClosed)?;
        response.await.map_err(|_| AgentError::SessionClosed)
    }
}

async fn serve<C>(mut agent: Agent<C>, mut inbox: mpsc::Receiver<Command>)
where
    C: Clock + Send + Sync,
{
    while let Some(command) = inbox.recv().await {
        let delivered = match command {
            Command::Message {
                input,
                cancel,
                reply,
            } => reply
                .send(agent.handle_message_with(&input, cancel).await)
                .is_ok(),
            Command::Detect {
                input,
                cancel,
                reply,
            } => reply
                .send(agent.detect_intent_with(&input, cancel).await)
                .is_ok(),
            Command::Execute {
                execution_id,
                cancel,
                reply,
            } => reply
                .send(agent.execute_pending_with(execution_id, cancel).await)
                .is_ok(),
            Command::Snapshot { reply } => reply.send(agent.snapshot()).is_ok(),
        };
        if !delivered {
            debug!("caller went away before its reply was ready");
        }
    }
    debug!("agent session stopped");
}
