use serde::{Deserialize, Serialize};

/// Reference to the ledger output backing a task, as returned by the
/// wallet service. Opaque to this app except for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoToken {
    pub txid: String,
    pub output_index: u32,
    pub locking_script: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Task {
    pub id: String,
    pub task: String,
    pub sats: u64,
    pub token: TodoToken,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub enum DialogPhase {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// State of the create-task dialog. Field values mirror the dialog's
/// controlled inputs and reset only on successful submission.
#[derive(Clone, Debug, Serialize)]
pub struct CreateDialog {
    pub phase: DialogPhase,
    pub task: String,
    pub amount: String,
}

impl Default for CreateDialog {
    fn default() -> Self {
        Self {
            phase: DialogPhase::Closed,
            task: String::new(),
            amount: crate::tasks::DEFAULT_AMOUNT_SATS.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CompleteDialog {
    pub phase: DialogPhase,
    /// Id of the task the dialog was opened for.
    pub selected: Option<String>,
}

/// Projection handed to the frontend by `list_tasks`.
#[derive(Clone, Debug, Serialize)]
pub struct TaskListView {
    pub loading: bool,
    pub tasks: Vec<Task>,
}
