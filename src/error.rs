//! クレート共通のエラー型

use thiserror::Error;

use crate::io::LoadError;

/// chatboard全体で使用するエラー
#[derive(Error, Debug)]
pub enum ChatboardError {
    /// 入力ファイルの読み込みエラー
    #[error(transparent)]
    Load(#[from] LoadError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 描画（出力）エラー
    #[error("Render error: {0}")]
    Render(String),

    /// 出力先へのI/Oエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSONシリアライズエラー
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChatboardError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

/// chatboardの結果型
pub type ChatboardResult<T> = Result<T, ChatboardError>;
