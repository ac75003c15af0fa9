//! 読み込み済みデータと表示設定をまとめたアプリケーションコンテキスト
//!
//! 起動時に一度だけ構築し、以降はセッションから読み取り専用で参照する。

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use super::config_manager::{DataConfig, DisplayConfig};
use super::models::ChatMessage;
use crate::analytics::{compute_emote_usage, EmoteUsage, GridRange};
use crate::chat_management::{EmoteMap, FilterCriteria};
use crate::io::datetime::end_of_day;
use crate::io::{load_emotes, load_messages, LoadError};

#[derive(Debug, Clone)]
pub struct AppContext {
    messages: Vec<ChatMessage>,
    emotes: EmoteMap,
    display: DisplayConfig,
    dropped_rows: usize,
}

impl AppContext {
    /// 絵文字対照表とメッセージを読み込む
    ///
    /// 表示用テキストの計算に対照表が必要なため、対照表を先に読む。
    pub fn load(data: &DataConfig, display: &DisplayConfig) -> Result<Self, LoadError> {
        let emotes = load_emotes(&data.emotes_path)?.with_emote_size(display.emote_size);
        let loaded = load_messages(&data.messages_path, &emotes)?;

        let context = Self {
            messages: loaded.messages,
            emotes,
            display: display.clone(),
            dropped_rows: loaded.dropped_rows,
        };
        info!(
            messages = context.messages.len(),
            emotes = context.emotes.len(),
            "🚀 Dashboard data ready"
        );
        Ok(context)
    }

    /// 読み込み済みの値から作成
    pub fn from_parts(messages: Vec<ChatMessage>, emotes: EmoteMap, display: DisplayConfig) -> Self {
        Self {
            messages,
            emotes,
            display,
            dropped_rows: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn emotes(&self) -> &EmoteMap {
        &self.emotes
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// データセット全体の最初と最後の日付
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.messages.iter().map(ChatMessage::date).min()?;
        let last = self.messages.iter().map(ChatMessage::date).max()?;
        Some((first, last))
    }

    /// 入力が無いときの期間（最初の日の0:00から最後の日の終わりまで）
    pub fn default_range(&self) -> Option<GridRange> {
        self.date_bounds()
            .map(|(first, last)| GridRange::from_parts(first, NaiveTime::MIN, last, end_of_day()))
    }

    /// フィルター条件の境界を既定値で補ったグリッド期間
    ///
    /// データが空の場合は指定された片側の境界の日付で補う。どちらも無ければ`None`。
    pub fn resolve_range(&self, criteria: &FilterCriteria) -> Option<GridRange> {
        let default = self.default_range();
        let start = criteria
            .start
            .or(default.map(|range| range.start))
            .or_else(|| criteria.end.map(|end| end.date().and_time(NaiveTime::MIN)))?;
        let end = criteria
            .end
            .or(default.map(|range| range.end))
            .unwrap_or_else(|| start.date().and_time(end_of_day()));
        Some(GridRange::new(start, end))
    }

    /// 全メッセージに対する絵文字の使用回数
    pub fn emote_usage(&self) -> Vec<EmoteUsage> {
        compute_emote_usage(&self.emotes, &self.messages)
    }
}
