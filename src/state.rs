use std::sync::Arc;

use parking_lot::Mutex;

use crate::tasks::types::{CompleteDialog, CreateDialog, Task};
use crate::wallet::TokenWallet;

pub struct AppState {
    pub tasks: Mutex<Vec<Task>>,
    /// True until the initial basket load finishes (success or failure).
    pub tasks_loading: Mutex<bool>,
    pub create_dialog: Mutex<CreateDialog>,
    pub complete_dialog: Mutex<CompleteDialog>,
    pub wallet: Arc<dyn TokenWallet>,
}

impl AppState {
    pub fn new(wallet: Arc<dyn TokenWallet>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            tasks_loading: Mutex::new(true),
            create_dialog: Mutex::new(CreateDialog::default()),
            complete_dialog: Mutex::new(CompleteDialog::default()),
            wallet,
        }
    }
}
