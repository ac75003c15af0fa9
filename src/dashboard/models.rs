use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::chat_management::EmoteMap;

/// メッセージ送信者のID（文字列表現で保持）
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 読み込まれたチャットメッセージ
///
/// `date` / `hour` / `display_text` は生フィールドから導出される値で、
/// 個別に書き換える手段は提供しない。生フィールドを変える場合は
/// 新しいメッセージを構築し直す。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    id: MessageId,
    author: String,
    timestamp: NaiveDateTime,
    text: Option<String>,
    display_text: Option<String>,
}

impl ChatMessage {
    /// 生フィールドからメッセージを構築し、表示用テキストを計算する
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        timestamp: NaiveDateTime,
        text: Option<String>,
        emotes: &EmoteMap,
    ) -> Self {
        let display_text = emotes.resolve(text.as_deref());
        Self {
            id: MessageId::new(id),
            author: author.into(),
            timestamp,
            text,
            display_text,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// タイムスタンプの日付部分
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// タイムスタンプの時（0-23）
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// 絵文字コードを画像参照に置換したテキスト
    pub fn display_text(&self) -> Option<&str> {
        self.display_text.as_deref()
    }
}

/// 表示中のタブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveTab {
    #[default]
    Analytics,
    EmoteTable,
}
