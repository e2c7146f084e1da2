pub mod types;

use uuid::Uuid;

use tracing::{error, info};

use crate::error::AppError;
use crate::state::AppState;
use types::{DialogPhase, Task, TaskListView};

/// Smallest deposit a task may be created with, in satoshis.
pub const MIN_AMOUNT_SATS: u64 = 500;
/// Amount the create dialog starts out with.
pub const DEFAULT_AMOUNT_SATS: u64 = 1000;

#[tauri::command]
pub fn list_tasks(state: tauri::State<'_, AppState>) -> TaskListView {
    TaskListView {
        loading: *state.tasks_loading.lock(),
        tasks: state.tasks.lock().clone(),
    }
}

#[tauri::command]
pub async fn load_tasks(state: tauri::State<'_, AppState>) -> Result<Vec<Task>, AppError> {
    load_tasks_flow(&state).await
}

#[tauri::command]
pub fn open_create_dialog(state: tauri::State<'_, AppState>) {
    open_create_dialog_flow(&state);
}

#[tauri::command]
pub fn cancel_create_dialog(state: tauri::State<'_, AppState>) {
    cancel_create_dialog_flow(&state);
}

#[tauri::command]
pub fn set_create_task(state: tauri::State<'_, AppState>, value: String) {
    state.create_dialog.lock().task = value;
}

#[tauri::command]
pub fn set_create_amount(state: tauri::State<'_, AppState>, value: String) {
    state.create_dialog.lock().amount = value;
}

#[tauri::command]
pub async fn submit_create(state: tauri::State<'_, AppState>) -> Result<Task, AppError> {
    submit_create_flow(&state).await
}

#[tauri::command]
pub fn open_complete_dialog(
    state: tauri::State<'_, AppState>,
    task_id: String,
) -> Result<(), AppError> {
    open_complete_dialog_flow(&state, task_id)
}

#[tauri::command]
pub fn cancel_complete_dialog(state: tauri::State<'_, AppState>) {
    cancel_complete_dialog_flow(&state);
}

#[tauri::command]
pub async fn submit_complete(state: tauri::State<'_, AppState>) -> Result<(), AppError> {
    submit_complete_flow(&state).await
}

pub fn open_create_dialog_flow(state: &AppState) {
    let mut dialog = state.create_dialog.lock();
    if dialog.phase == DialogPhase::Closed {
        dialog.phase = DialogPhase::Open;
    }
}

/// Cancel is a no-op while a submission is in flight; the flow's completion
/// settles the dialog.
pub fn cancel_create_dialog_flow(state: &AppState) {
    let mut dialog = state.create_dialog.lock();
    if dialog.phase == DialogPhase::Open {
        dialog.phase = DialogPhase::Closed;
    }
}

pub fn cancel_complete_dialog_flow(state: &AppState) {
    let mut dialog = state.complete_dialog.lock();
    if dialog.phase == DialogPhase::Open {
        dialog.phase = DialogPhase::Closed;
        dialog.selected = None;
    }
}

/// Populate the task list from the wallet's token basket. Clears the
/// loading flag on every exit path.
pub async fn load_tasks_flow(state: &AppState) -> Result<Vec<Task>, AppError> {
    let result = state.wallet.list_outputs().await;
    *state.tasks_loading.lock() = false;

    let outputs = match result {
        Ok(outputs) => outputs,
        Err(e) => {
            error!(%e, "failed to load ToDo tasks");
            return Err(e);
        }
    };

    let tasks: Vec<Task> = outputs
        .into_iter()
        .filter_map(|output| {
            // fields[0] is the protocol address, fields[1] the task text.
            let task = output.fields.get(1)?.clone();
            Some(Task {
                id: Uuid::new_v4().to_string(),
                task,
                sats: output.satoshis,
                token: types::TodoToken {
                    txid: output.txid,
                    output_index: output.output_index,
                    locking_script: output.locking_script,
                },
            })
        })
        .collect();

    info!(count = tasks.len(), "loaded ToDo tasks");
    *state.tasks.lock() = tasks.clone();
    Ok(tasks)
}

/// Create-task flow: validate the dialog's fields, mint a token output for
/// the deposit, and prepend the new task. The task is added only after the
/// wallet confirms; any failure leaves the list untouched.
pub async fn submit_create_flow(state: &AppState) -> Result<Task, AppError> {
    // Validate and transition to Submitting under one lock; the wallet
    // call itself runs with no lock held.
    let (task_text, amount) = {
        let mut dialog = state.create_dialog.lock();
        if dialog.phase == DialogPhase::Submitting {
            return Err(AppError::Busy);
        }

        let task_text = dialog.task.trim().to_string();
        if task_text.is_empty() {
            return Err(AppError::Validation("Enter a task to complete!".into()));
        }
        let amount = match dialog.amount.trim().parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(AppError::Validation(
                    "Enter an amount for the new task!".into(),
                ));
            }
        };
        if amount < MIN_AMOUNT_SATS {
            return Err(AppError::Validation(format!(
                "The amount must be at least {MIN_AMOUNT_SATS} satoshis!"
            )));
        }

        dialog.phase = DialogPhase::Submitting;
        (task_text, amount)
    };

    match state.wallet.create_output(&task_text, amount).await {
        Ok(token) => {
            let task = Task {
                id: Uuid::new_v4().to_string(),
                task: task_text,
                sats: amount,
                token,
            };
            state.tasks.lock().insert(0, task.clone());
            *state.create_dialog.lock() = types::CreateDialog::default();
            info!(task = %task.task, sats = task.sats, txid = %task.token.txid, "task created");
            Ok(task)
        }
        Err(e) => {
            let mut dialog = state.create_dialog.lock();
            if dialog.phase == DialogPhase::Submitting {
                dialog.phase = DialogPhase::Open;
            }
            error!(%e, "task creation failed");
            Err(e)
        }
    }
}

pub fn open_complete_dialog_flow(state: &AppState, task_id: String) -> Result<(), AppError> {
    if !state.tasks.lock().iter().any(|t| t.id == task_id) {
        return Err(AppError::TaskNotFound(task_id));
    }
    let mut dialog = state.complete_dialog.lock();
    if dialog.phase != DialogPhase::Submitting {
        dialog.phase = DialogPhase::Open;
        dialog.selected = Some(task_id);
    }
    Ok(())
}

/// Complete-task flow: redeem the selected task's token output and drop the
/// task from the list. On failure the task stays listed so the user can
/// retry.
pub async fn submit_complete_flow(state: &AppState) -> Result<(), AppError> {
    let (task_id, task_text, token, sats) = {
        let mut dialog = state.complete_dialog.lock();
        if dialog.phase == DialogPhase::Submitting {
            return Err(AppError::Busy);
        }
        let task_id = dialog
            .selected
            .clone()
            .ok_or_else(|| AppError::Validation("No task selected".into()))?;

        let tasks = state.tasks.lock();
        let task = tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| AppError::TaskNotFound(task_id.clone()))?;
        let cloned = (task_id, task.task.clone(), task.token.clone(), task.sats);
        drop(tasks);

        dialog.phase = DialogPhase::Submitting;
        cloned
    };

    match state.wallet.redeem_output(&token, sats, &task_text).await {
        Ok(redemption) => {
            // Replace the list with one excluding the completed task rather
            // than splicing in place.
            let mut tasks = state.tasks.lock();
            let remaining: Vec<Task> = tasks.iter().filter(|t| t.id != task_id).cloned().collect();
            *tasks = remaining;
            drop(tasks);

            *state.complete_dialog.lock() = types::CompleteDialog::default();
            info!(task = %task_text, sats, txid = %redemption.txid, "task completed");
            Ok(())
        }
        Err(e) => {
            let mut dialog = state.complete_dialog.lock();
            if dialog.phase == DialogPhase::Submitting {
                dialog.phase = DialogPhase::Open;
            }
            error!(%e, "task completion failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::types::{CreateDialog, DialogPhase, TodoToken};
    use super::*;
    use crate::wallet::types::{ListedOutput, Redemption};
    use crate::wallet::TokenWallet;

    #[derive(Default)]
    struct FakeWallet {
        creates: Mutex<Vec<(String, u64)>>,
        redeems: Mutex<Vec<(TodoToken, u64)>>,
        listed: Mutex<Vec<ListedOutput>>,
        fail_create: bool,
        fail_redeem: bool,
        fail_list: bool,
    }

    #[async_trait]
    impl TokenWallet for FakeWallet {
        async fn create_output(&self, task: &str, satoshis: u64) -> Result<TodoToken, AppError> {
            self.creates.lock().push((task.to_string(), satoshis));
            if self.fail_create {
                return Err(AppError::Wallet("signer unavailable".into()));
            }
            Ok(TodoToken {
                txid: format!("txid-{}", self.creates.lock().len()),
                output_index: 0,
                locking_script: format!("script carrying {task}"),
            })
        }

        async fn redeem_output(
            &self,
            token: &TodoToken,
            satoshis: u64,
            _task: &str,
        ) -> Result<Redemption, AppError> {
            self.redeems.lock().push((token.clone(), satoshis));
            if self.fail_redeem {
                return Err(AppError::Wallet("broadcast failed".into()));
            }
            Ok(Redemption {
                txid: "redeem-txid".into(),
            })
        }

        async fn list_outputs(&self) -> Result<Vec<ListedOutput>, AppError> {
            if self.fail_list {
                return Err(AppError::Wallet("wallet offline".into()));
            }
            Ok(self.listed.lock().clone())
        }
    }

    fn state_with(wallet: Arc<FakeWallet>) -> AppState {
        let state = AppState::new(wallet);
        *state.tasks_loading.lock() = false;
        state
    }

    fn fill_create_dialog(state: &AppState, task: &str, amount: &str) {
        let mut dialog = state.create_dialog.lock();
        dialog.phase = DialogPhase::Open;
        dialog.task = task.to_string();
        dialog.amount = amount.to_string();
    }

    fn seeded_task(n: u32) -> Task {
        Task {
            id: format!("task-{n}"),
            task: format!("Chore {n}"),
            sats: 500 + u64::from(n),
            token: TodoToken {
                txid: format!("seed-txid-{n}"),
                output_index: 0,
                locking_script: "seed-script".into(),
            },
        }
    }

    #[tokio::test]
    async fn create_rejects_amount_below_minimum_without_wallet_call() {
        let wallet = Arc::new(FakeWallet::default());
        let state = state_with(wallet.clone());
        fill_create_dialog(&state, "Buy milk", "100");

        let err = submit_create_flow(&state).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(wallet.creates.lock().is_empty());
        assert!(state.tasks.lock().is_empty());
        // Fields are kept so the user can correct the amount.
        let dialog = state.create_dialog.lock();
        assert_eq!(dialog.phase, DialogPhase::Open);
        assert_eq!(dialog.task, "Buy milk");
    }

    #[tokio::test]
    async fn create_rejects_empty_description() {
        let wallet = Arc::new(FakeWallet::default());
        let state = state_with(wallet.clone());
        fill_create_dialog(&state, "   ", "1000");

        let err = submit_create_flow(&state).await.unwrap_err();
        assert_eq!(err.to_string(), "Enter a task to complete!");
        assert!(wallet.creates.lock().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_missing_or_unparseable_amount() {
        let wallet = Arc::new(FakeWallet::default());
        let state = state_with(wallet.clone());

        for bad in ["", "0", "five hundred"] {
            fill_create_dialog(&state, "Buy milk", bad);
            let err = submit_create_flow(&state).await.unwrap_err();
            assert_eq!(err.to_string(), "Enter an amount for the new task!");
        }
        assert!(wallet.creates.lock().is_empty());
    }

    #[tokio::test]
    async fn create_prepends_task_and_resets_dialog() {
        let wallet = Arc::new(FakeWallet::default());
        let state = state_with(wallet.clone());
        state.tasks.lock().push(seeded_task(1));
        fill_create_dialog(&state, "Buy milk", "1000");

        let created = submit_create_flow(&state).await.unwrap();
        assert_eq!(created.task, "Buy milk");
        assert_eq!(created.sats, 1000);

        // Collaborator saw the validated amount and the task text.
        let calls = wallet.creates.lock();
        assert_eq!(calls.as_slice(), &[("Buy milk".to_string(), 1000)]);

        // Exactly one new entry, prepended, carrying the minted token.
        let tasks = state.tasks.lock();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task, "Buy milk");
        assert!(tasks[0].token.locking_script.contains("Buy milk"));
        assert_eq!(tasks[1].id, "task-1");

        // Dialog closed with fields back to defaults.
        let dialog = state.create_dialog.lock();
        assert_eq!(dialog.phase, DialogPhase::Closed);
        assert_eq!(dialog.task, "");
        assert_eq!(dialog.amount, DEFAULT_AMOUNT_SATS.to_string());
    }

    #[tokio::test]
    async fn failed_create_leaves_list_unchanged_and_dialog_open() {
        let wallet = Arc::new(FakeWallet {
            fail_create: true,
            ..FakeWallet::default()
        });
        let state = state_with(wallet.clone());
        state.tasks.lock().push(seeded_task(1));
        fill_create_dialog(&state, "Buy milk", "1000");

        let err = submit_create_flow(&state).await.unwrap_err();
        assert_eq!(err.to_string(), "signer unavailable");
        assert_eq!(state.tasks.lock().len(), 1);

        let dialog = state.create_dialog.lock();
        assert_eq!(dialog.phase, DialogPhase::Open);
        assert_eq!(dialog.task, "Buy milk");
    }

    #[tokio::test]
    async fn create_debounces_concurrent_submissions() {
        let wallet = Arc::new(FakeWallet::default());
        let state = state_with(wallet.clone());
        fill_create_dialog(&state, "Buy milk", "1000");
        state.create_dialog.lock().phase = DialogPhase::Submitting;

        let err = submit_create_flow(&state).await.unwrap_err();
        assert!(matches!(err, AppError::Busy));
        assert!(wallet.creates.lock().is_empty());
    }

    #[tokio::test]
    async fn complete_removes_only_the_selected_task() {
        let wallet = Arc::new(FakeWallet::default());
        let state = state_with(wallet.clone());
        {
            let mut tasks = state.tasks.lock();
            tasks.push(seeded_task(1));
            tasks.push(seeded_task(2));
            tasks.push(seeded_task(3));
        }

        open_complete_dialog_flow(&state, "task-2".into()).unwrap();
        submit_complete_flow(&state).await.unwrap();

        // Collaborator called with the selected task's token and amount.
        let redeems = wallet.redeems.lock();
        assert_eq!(redeems.len(), 1);
        assert_eq!(redeems[0].0.txid, "seed-txid-2");
        assert_eq!(redeems[0].1, 502);

        let tasks = state.tasks.lock();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["task-1", "task-3"]);

        let dialog = state.complete_dialog.lock();
        assert_eq!(dialog.phase, DialogPhase::Closed);
        assert!(dialog.selected.is_none());
    }

    #[tokio::test]
    async fn failed_complete_keeps_task_and_allows_retry() {
        let wallet = Arc::new(FakeWallet {
            fail_redeem: true,
            ..FakeWallet::default()
        });
        let state = state_with(wallet.clone());
        state.tasks.lock().push(seeded_task(1));

        open_complete_dialog_flow(&state, "task-1".into()).unwrap();
        let err = submit_complete_flow(&state).await.unwrap_err();
        assert_eq!(err.to_string(), "broadcast failed");

        assert_eq!(state.tasks.lock().len(), 1);
        let dialog = state.complete_dialog.lock();
        assert_eq!(dialog.phase, DialogPhase::Open);
        assert_eq!(dialog.selected.as_deref(), Some("task-1"));
    }

    #[tokio::test]
    async fn opening_and_cancelling_dialogs_never_mutates_the_list() {
        let wallet = Arc::new(FakeWallet::default());
        let state = state_with(wallet.clone());
        state.tasks.lock().push(seeded_task(1));

        open_create_dialog_flow(&state);
        state.create_dialog.lock().task = "abandoned".into();
        cancel_create_dialog_flow(&state);
        assert_eq!(state.create_dialog.lock().phase, DialogPhase::Closed);

        open_complete_dialog_flow(&state, "task-1".into()).unwrap();
        cancel_complete_dialog_flow(&state);
        assert_eq!(state.complete_dialog.lock().phase, DialogPhase::Closed);

        assert_eq!(state.tasks.lock().len(), 1);
        assert!(wallet.creates.lock().is_empty());
        assert!(wallet.redeems.lock().is_empty());
    }

    #[tokio::test]
    async fn open_complete_dialog_rejects_unknown_task() {
        let state = state_with(Arc::new(FakeWallet::default()));
        let err = open_complete_dialog_flow(&state, "nope".into()).unwrap_err();
        assert!(matches!(err, AppError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn load_tasks_projects_basket_outputs() {
        let wallet = Arc::new(FakeWallet::default());
        wallet.listed.lock().push(ListedOutput {
            txid: "loaded-txid".into(),
            output_index: 2,
            locking_script: "loaded-script".into(),
            satoshis: 750,
            fields: vec!["my todo protocol".into(), "Water plants".into()],
        });
        let state = AppState::new(wallet);
        assert!(*state.tasks_loading.lock());

        let tasks = load_tasks_flow(&state).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Water plants");
        assert_eq!(tasks[0].sats, 750);
        assert_eq!(tasks[0].token.output_index, 2);
        assert!(!*state.tasks_loading.lock());
    }

    #[tokio::test]
    async fn load_failure_still_clears_loading() {
        let wallet = Arc::new(FakeWallet {
            fail_list: true,
            ..FakeWallet::default()
        });
        let state = AppState::new(wallet);

        let err = load_tasks_flow(&state).await.unwrap_err();
        assert_eq!(err.to_string(), "wallet offline");
        assert!(!*state.tasks_loading.lock());
        assert!(state.tasks.lock().is_empty());
    }

    #[test]
    fn create_dialog_defaults_match_initial_ui() {
        let dialog = CreateDialog::default();
        assert_eq!(dialog.phase, DialogPhase::Closed);
        assert_eq!(dialog.task, "");
        assert_eq!(dialog.amount, "1000");
    }
}
