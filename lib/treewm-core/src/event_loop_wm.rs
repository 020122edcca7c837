use crate::layouts::{LayoutError, SerializedContainerTree};
use crate::wm::{ContainerSelector, LayoutAction, LayoutManager};
use log::{error, info, trace, warn};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutOperationError {
    #[error("Could not move container: {0}")]
    Move(LayoutError),
    #[error("Could not focus container: {0}")]
    Focus(LayoutError),
    #[error("Layout event loop has shut down")]
    Shutdown,
}

pub type LayoutOperationResult<T> = Result<T, LayoutOperationError>;

pub enum LayoutCommand {
    MoveWithinTree {
        container: ContainerSelector,
        target_parent: ContainerSelector,
        target_index: usize,
        reply: oneshot::Sender<LayoutOperationResult<()>>,
    },
    Focus {
        container: ContainerSelector,
        reply: oneshot::Sender<LayoutOperationResult<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SerializedContainerTree>,
    },
    DebugLayout {
        reply: oneshot::Sender<String>,
    },
    Shutdown,
}

/// Serializes every layout operation through one task that owns the tree
pub struct LayoutEventLoop {}

impl LayoutEventLoop {
    /// Spawns the loop on the current tokio runtime. The join handle yields the manager
    /// back once the loop has shut down.
    pub fn spawn(manager: LayoutManager) -> (LayoutHandle, JoinHandle<LayoutManager>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(Self::run(manager, receiver));
        (LayoutHandle { sender }, task)
    }

    pub async fn run(
        mut manager: LayoutManager,
        mut receiver: mpsc::UnboundedReceiver<LayoutCommand>,
    ) -> LayoutManager {
        trace!("Handling layout commands...");

        while let Some(command) = receiver.recv().await {
            match command {
                LayoutCommand::MoveWithinTree {
                    container,
                    target_parent,
                    target_index,
                    reply,
                } => {
                    let result = manager
                        .move_within_tree(&container, &target_parent, target_index)
                        .map_err(LayoutOperationError::Move)
                        .inspect_err(Self::handle_error);
                    let _ = reply.send(result);
                }
                LayoutCommand::Focus { container, reply } => {
                    let result = manager
                        .focus(&container)
                        .map_err(LayoutOperationError::Focus)
                        .inspect_err(Self::handle_error);
                    let _ = reply.send(result);
                }
                LayoutCommand::Snapshot { reply } => {
                    let _ = reply.send(manager.serialize());
                }
                LayoutCommand::DebugLayout { reply } => {
                    let _ = reply.send(manager.debug_layout());
                }
                LayoutCommand::Shutdown => break,
            }
        }

        info!("Layout event loop stopped");
        manager
    }

    fn handle_error(error: &LayoutOperationError) {
        match error {
            LayoutOperationError::Move(LayoutError::Corrupted(_))
            | LayoutOperationError::Focus(LayoutError::Corrupted(_)) => error!("Error: {error}"),
            _ => warn!("{error}"),
        }
    }
}

/// Cloneable client for a running [`LayoutEventLoop`]
#[derive(Debug, Clone)]
pub struct LayoutHandle {
    sender: mpsc::UnboundedSender<LayoutCommand>,
}

impl LayoutHandle {
    fn send(&self, command: LayoutCommand) -> LayoutOperationResult<()> {
        self.sender
            .send(command)
            .map_err(|_| LayoutOperationError::Shutdown)
    }

    async fn request<R>(
        &self,
        command: impl FnOnce(oneshot::Sender<R>) -> LayoutCommand,
    ) -> LayoutOperationResult<R> {
        let (reply, response) = oneshot::channel();
        self.send(command(reply))?;
        response.await.map_err(|_| LayoutOperationError::Shutdown)
    }

    pub async fn move_within_tree(
        &self,
        container: impl Into<ContainerSelector>,
        target_parent: impl Into<ContainerSelector>,
        target_index: usize,
    ) -> LayoutOperationResult<()> {
        let container = container.into();
        let target_parent = target_parent.into();
        self.request(|reply| LayoutCommand::MoveWithinTree {
            container,
            target_parent,
            target_index,
            reply,
        })
        .await?
    }

    pub async fn focus(&self, container: impl Into<ContainerSelector>) -> LayoutOperationResult<()> {
        let container = container.into();
        self.request(|reply| LayoutCommand::Focus { container, reply })
            .await?
    }

    pub async fn apply(&self, action: LayoutAction) -> LayoutOperationResult<()> {
        match action {
            LayoutAction::Focus(container) => self.focus(container).await,
            LayoutAction::Move {
                container,
                target_parent,
                target_index,
            } => {
                self.move_within_tree(container, target_parent, target_index)
                    .await
            }
        }
    }

    pub async fn snapshot(&self) -> LayoutOperationResult<SerializedContainerTree> {
        self.request(|reply| LayoutCommand::Snapshot { reply }).await
    }

    pub async fn debug_layout(&self) -> LayoutOperationResult<String> {
        self.request(|reply| LayoutCommand::DebugLayout { reply })
            .await
    }

    pub fn shutdown(&self) -> LayoutOperationResult<()> {
        self.send(LayoutCommand::Shutdown)
    }
}
