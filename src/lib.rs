pub mod error;
pub mod state;
pub mod tasks;
pub mod wallet;

use std::sync::Arc;

use state::AppState;
use wallet::HttpWallet;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(AppState::new(Arc::new(HttpWallet::new())))
        .invoke_handler(tauri::generate_handler![
            tasks::list_tasks,
            tasks::load_tasks,
            tasks::open_create_dialog,
            tasks::cancel_create_dialog,
            tasks::set_create_task,
            tasks::set_create_amount,
            tasks::submit_create,
            tasks::open_complete_dialog,
            tasks::cancel_complete_dialog,
            tasks::submit_complete,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
