pub mod profile_handler;
pub mod settings_handler;
pub mod storage_handler;
