//! 絵文字コード（`:code:`）を画像参照に置換する

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// インライン表示時の画像幅（px）
pub const DEFAULT_EMOTE_SIZE: u32 = 24;

static EMOJI_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[^:]+:").expect("emoji code pattern is valid"));

/// 絵文字対照表の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteEntry {
    /// コロンを含むコード（例: `:face-fuchsia-tongue-out:`）
    pub code: String,
    /// 画像のURL
    pub asset_url: String,
}

impl EmoteEntry {
    pub fn new(code: impl Into<String>, asset_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            asset_url: asset_url.into(),
        }
    }
}

/// 絵文字コード → 画像URLの対照表
#[derive(Debug, Clone, PartialEq)]
pub struct EmoteMap {
    entries: Vec<EmoteEntry>,
    index: HashMap<String, usize>,
    emote_size: u32,
}

impl Default for EmoteMap {
    fn default() -> Self {
        Self::new()
    }
}

impl EmoteMap {
    /// 空の対照表（置換は一切行われない）
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            emote_size: DEFAULT_EMOTE_SIZE,
        }
    }

    /// エントリ列から対照表を作成。同じコードが複数ある場合は後のものが優先される
    pub fn from_entries(entries: impl IntoIterator<Item = EmoteEntry>) -> Self {
        let mut map = Self::new();
        for entry in entries {
            map.insert(entry);
        }
        map
    }

    pub fn with_emote_size(mut self, emote_size: u32) -> Self {
        self.emote_size = emote_size;
        self
    }

    /// 既存のコードは位置を保ったままURLを上書きする
    pub fn insert(&mut self, entry: EmoteEntry) {
        match self.index.get(&entry.code) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index.insert(entry.code.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// ファイル順のエントリ一覧
    pub fn entries(&self) -> &[EmoteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn emote_size(&self) -> u32 {
        self.emote_size
    }

    /// コードに対応する画像URL
    pub fn get(&self, code: &str) -> Option<&str> {
        self.index
            .get(code)
            .map(|&position| self.entries[position].asset_url.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// メッセージを表示用テキストに変換する。`None`はそのまま返す
    pub fn resolve(&self, text: Option<&str>) -> Option<String> {
        text.map(|text| self.resolve_str(text))
    }

    /// 対照表にあるコードをすべて`<img>`タグへ置換する
    ///
    /// 生成されるタグにはコロンで囲まれたコードが残らないため、
    /// 置換済みテキストに再適用しても結果は変わらない。
    pub fn resolve_str(&self, text: &str) -> String {
        let mut resolved = text.to_string();
        for code in self.known_codes(text) {
            if let Some(url) = self.get(code) {
                resolved = resolved.replace(code, &self.image_tag(code, url));
            }
        }
        resolved
    }

    /// テキスト中に現れる既知コード（重複なし、出現順）
    ///
    /// 見つかったコードは位置に関係なくすべての出現が置換対象になるため、
    /// 未知のトークンに続くコード（`:x:smile:`）も拾える。
    fn known_codes<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut codes: Vec<&str> = Vec::new();
        for found in EMOJI_CODE_PATTERN.find_iter(text) {
            let code = found.as_str();
            if self.contains(code) && !codes.contains(&code) {
                codes.push(code);
            }
        }
        codes
    }

    /// インライン表示用の`<img>`タグ
    pub fn image_tag(&self, code: &str, url: &str) -> String {
        format!(
            r#"<img src="{}" alt="{}" width="{}" class="emote">"#,
            escape_attribute(url),
            escape_attribute(code.trim_matches(':')),
            self.emote_size
        )
    }

    /// テキスト中の既知コードの出現回数を加算する
    pub fn count_codes(&self, text: &str, counts: &mut HashMap<String, usize>) {
        for code in self.known_codes(text) {
            *counts.entry(code.to_string()).or_insert(0) += text.matches(code).count();
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
