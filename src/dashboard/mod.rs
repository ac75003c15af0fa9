//! ダッシュボード層
//!
//! 読み込み済みデータ（`AppContext`）とセッション状態を持ち、
//! 集計結果を`Presenter`経由で描画する。

pub mod app_context;
pub mod commands;
pub mod config_manager;
pub mod json_presenter;
pub mod models;
pub mod pagination;
pub mod presenter;
pub mod session;
pub mod text_presenter;
pub mod utils;

pub use app_context::AppContext;
pub use commands::{apply_command, run_interactive, Command, CommandError};
pub use config_manager::{AppConfig, ConfigManager, DataConfig, DisplayConfig, LogConfig};
pub use json_presenter::JsonPresenter;
pub use models::{ActiveTab, ChatMessage, MessageId};
pub use pagination::{Page, Pagination};
pub use presenter::Presenter;
pub use session::{DashboardSession, DashboardView};
pub use text_presenter::TextPresenter;
