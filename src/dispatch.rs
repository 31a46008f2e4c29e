//! Routes a task description to the first matching action.

use tracing::{error, info, warn};

use crate::actions::{ActionRegistry, Workspace};

/// How a dispatched task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The action ran to completion.
    Completed { action: String, message: String },
    /// No trigger phrase occurs in the task.
    Unrecognized,
    /// The action failed; `error` is the full cause chain.
    Failed { action: String, error: String },
}

/// Holds the registry and the data root. Performs no I/O itself.
pub struct Dispatcher {
    registry: ActionRegistry,
    workspace: Workspace,
}

impl Dispatcher {
    pub fn new(registry: ActionRegistry, workspace: Workspace) -> Self {
        Self {
            registry,
            workspace,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub async fn handle(&self, task: &str) -> Outcome {
        let Some(action) = self.registry.find(task) else {
            warn!(task, "no action matches task");
            return Outcome::Unrecognized;
        };

        let name = action.name().to_string();
        info!(action = %name, task, "dispatching");

        match action.execute(&self.workspace).await {
            Ok(message) => {
                info!(action = %name, "action completed");
                Outcome::Completed {
                    action: name,
                    message,
                }
            }
            Err(e) => {
                let error = format!("{e:#}");
                error!(action = %name, %error, "action failed");
                Outcome::Failed {
                    action: name,
                    error,
                }
            }
        }
    }
}
