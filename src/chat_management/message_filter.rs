use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dashboard::models::ChatMessage;

/// メッセージフィルター条件
///
/// すべての条件は任意。指定された条件のみがAND条件として適用される。
/// 空文字列（空白のみを含む）は未指定として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// ID完全一致（文字列表現同士で比較）
    pub id: Option<String>,
    /// 作者名の部分一致（大小文字無視）
    pub author: Option<String>,
    /// メッセージ本文の部分一致（大小文字無視）
    pub text: Option<String>,
    /// 開始日時（この時刻を含む）
    pub start: Option<NaiveDateTime>,
    /// 終了日時（この時刻を含む）
    pub end: Option<NaiveDateTime>,
}

/// 比較用に正規化済みのフィルター
struct PreparedFilter<'a> {
    id: Option<&'a str>,
    author: Option<String>,
    text: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl PreparedFilter<'_> {
    fn matches(&self, message: &ChatMessage) -> bool {
        if let Some(id) = self.id {
            if message.id().as_str() != id {
                return false;
            }
        }

        if let Some(author) = &self.author {
            if !message.author().to_lowercase().contains(author.as_str()) {
                return false;
            }
        }

        if let Some(text) = &self.text {
            // 本文のないメッセージは本文条件に一致しない
            match message.text() {
                Some(content) if content.to_lowercase().contains(text.as_str()) => {}
                _ => return false,
            }
        }

        if let Some(start) = self.start {
            if message.timestamp() < start {
                return false;
            }
        }

        if let Some(end) = self.end {
            if message.timestamp() > end {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// 時間範囲を設定（両端を含む）
    pub fn with_time_range(
        mut self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// すべての条件をクリア
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn prepare(&self) -> PreparedFilter<'_> {
        PreparedFilter {
            id: non_empty(&self.id),
            author: non_empty(&self.author).map(str::to_lowercase),
            text: non_empty(&self.text).map(str::to_lowercase),
            start: self.start,
            end: self.end,
        }
    }

    /// メッセージがすべての指定条件に一致するか
    pub fn matches(&self, message: &ChatMessage) -> bool {
        self.prepare().matches(message)
    }

    /// フィルターを適用したメッセージ一覧を取得（入力順を保持）
    pub fn filter_messages(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let prepared = self.prepare();
        messages
            .iter()
            .filter(|message| prepared.matches(message))
            .cloned()
            .collect()
    }

    /// アクティブな条件数（時間範囲は開始・終了をまとめて1つ）
    pub fn active_filter_count(&self) -> usize {
        let mut count = 0;

        if non_empty(&self.id).is_some() {
            count += 1;
        }
        if non_empty(&self.author).is_some() {
            count += 1;
        }
        if non_empty(&self.text).is_some() {
            count += 1;
        }
        if self.start.is_some() || self.end.is_some() {
            count += 1;
        }

        count
    }

    /// フィルターが有効かどうか
    pub fn is_active(&self) -> bool {
        self.active_filter_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_management::EmoteMap;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn create_test_message(id: &str, author: &str, at: &str, text: Option<&str>) -> ChatMessage {
        ChatMessage::new(
            id,
            author,
            ts(at),
            text.map(str::to_string),
            &EmoteMap::new(),
        )
    }

    fn sample_messages() -> Vec<ChatMessage> {
        vec![
            create_test_message("1", "Alice", "2024-01-01 09:00", Some("Hello world")),
            create_test_message("2", "Bob", "2024-01-01 10:30", Some("HELLO everyone")),
            create_test_message("1", "Alice", "2024-01-02 08:00", Some("Goodbye")),
            create_test_message("3", "alicia", "2024-01-02 18:45", None),
            create_test_message("007", "Bond", "2024-01-03 00:00", Some("licence")),
        ]
    }

    #[test]
    fn test_default_filter_returns_everything() {
        let filter = FilterCriteria::default();
        let messages = sample_messages();

        assert!(!filter.is_active());
        assert_eq!(filter.filter_messages(&messages), messages);
    }

    #[test]
    fn test_empty_strings_are_ignored() {
        let filter = FilterCriteria::new().with_id("").with_author("   ").with_text("");
        assert!(!filter.is_active());
        assert_eq!(filter.filter_messages(&sample_messages()).len(), 5);
    }

    #[test]
    fn test_id_exact_string_match() {
        let messages = sample_messages();

        let filtered = FilterCriteria::new().with_id("1").filter_messages(&messages);
        assert_eq!(filtered.len(), 2);

        // 先頭ゼロは文字列として比較される
        assert_eq!(FilterCriteria::new().with_id("7").filter_messages(&messages).len(), 0);
        assert_eq!(FilterCriteria::new().with_id("007").filter_messages(&messages).len(), 1);
    }

    #[test]
    fn test_author_case_insensitive_substring() {
        let filtered = FilterCriteria::new()
            .with_author("ALI")
            .filter_messages(&sample_messages());

        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|m| m.author().to_lowercase().contains("ali")));
    }

    #[test]
    fn test_text_case_insensitive_and_absent_text() {
        let filtered = FilterCriteria::new()
            .with_text("hello")
            .filter_messages(&sample_messages());
        assert_eq!(filtered.len(), 2);

        // 本文なしのメッセージは一致しない
        let filtered = FilterCriteria::new()
            .with_author("alicia")
            .with_text("e")
            .filter_messages(&sample_messages());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_time_range_is_inclusive() {
        let filter = FilterCriteria::new()
            .with_time_range(Some(ts("2024-01-01 10:30")), Some(ts("2024-01-02 18:45")));
        let filtered = filter.filter_messages(&sample_messages());

        let ids: Vec<&str> = filtered.iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_open_ended_ranges() {
        let messages = sample_messages();

        let only_start = FilterCriteria::new().with_time_range(Some(ts("2024-01-02 00:00")), None);
        assert_eq!(only_start.filter_messages(&messages).len(), 3);

        let only_end = FilterCriteria::new().with_time_range(None, Some(ts("2024-01-01 09:00")));
        assert_eq!(only_end.filter_messages(&messages).len(), 1);
    }

    #[test]
    fn test_conjunction_equals_intersection() {
        let messages = sample_messages();
        let by_author = FilterCriteria::new().with_author("ali");
        let by_range =
            FilterCriteria::new().with_time_range(Some(ts("2024-01-02 00:00")), None);
        let combined = FilterCriteria::new()
            .with_author("ali")
            .with_time_range(Some(ts("2024-01-02 00:00")), None);

        let expected: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| by_author.matches(m) && by_range.matches(m))
            .cloned()
            .collect();

        assert_eq!(combined.filter_messages(&messages), expected);
        assert_eq!(combined.active_filter_count(), 2);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let filtered = FilterCriteria::new()
            .with_author("nobody")
            .filter_messages(&sample_messages());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut filter = FilterCriteria::new().with_id("1").with_text("x");
        assert_eq!(filter.active_filter_count(), 2);

        filter.clear();
        assert_eq!(filter, FilterCriteria::default());
    }
}
