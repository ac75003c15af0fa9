use serde::Serialize;
use std::collections::HashMap;

use crate::dashboard::models::{ChatMessage, MessageId};

/// 上位ユーザーとして表示する人数
pub const DEFAULT_TOP_N: usize = 5;

/// ランキングの1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedUser {
    pub id: MessageId,
    pub author: String,
    pub message_count: usize,
}

/// 発言数上位ユーザーのランキング
///
/// N位と同数のユーザーはすべて含めるため、件数がNを超えることがある。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopUsersRanking {
    /// 発言数の降順
    ranked: Vec<RankedUser>,
    /// 集計対象となった (id, author) の組数
    total_distinct: usize,
    /// 選出に使った境界の発言数
    threshold: usize,
}

impl TopUsersRanking {
    /// ランキングを計算。メッセージが無い場合は`None`（データなし）
    pub fn compute(messages: &[ChatMessage], top_n: usize) -> Option<Self> {
        let mut counts: HashMap<(&MessageId, &str), usize> = HashMap::new();
        for message in messages {
            *counts
                .entry((message.id(), message.author()))
                .or_insert(0) += 1;
        }

        if counts.is_empty() {
            return None;
        }

        let mut all_users: Vec<RankedUser> = counts
            .into_iter()
            .map(|((id, author), message_count)| RankedUser {
                id: id.clone(),
                author: author.to_string(),
                message_count,
            })
            .collect();

        // 同数は (id, author) の昇順で並べて結果を決定的にする
        all_users.sort_by(|a, b| {
            b.message_count
                .cmp(&a.message_count)
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.author.cmp(&b.author))
        });

        let total_distinct = all_users.len();
        let boundary = top_n.max(1).min(total_distinct);
        let threshold = all_users[boundary - 1].message_count;
        all_users.retain(|user| user.message_count >= threshold);

        tracing::debug!(
            total_distinct,
            threshold,
            selected = all_users.len(),
            "🏆 Top users ranked"
        );

        Some(Self {
            ranked: all_users,
            total_distinct,
            threshold,
        })
    }

    /// 発言数の降順
    pub fn ranked(&self) -> &[RankedUser] {
        &self.ranked
    }

    /// 横棒グラフ用の並び（発言数の昇順）
    pub fn display_order(&self) -> Vec<&RankedUser> {
        self.ranked.iter().rev().collect()
    }

    pub fn total_distinct(&self) -> usize {
        self.total_distinct
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_management::EmoteMap;
    use chrono::NaiveDateTime;

    fn messages_for(counts: &[(&str, &str, usize)]) -> Vec<ChatMessage> {
        let at = NaiveDateTime::parse_from_str("2024-01-01 09:00", "%Y-%m-%d %H:%M").unwrap();
        let emotes = EmoteMap::new();
        counts
            .iter()
            .flat_map(|&(id, author, count)| {
                (0..count).map(move |_| (id, author))
            })
            .map(|(id, author)| ChatMessage::new(id, author, at, None, &emotes))
            .collect()
    }

    #[test]
    fn test_strict_sequence_returns_exactly_five() {
        let messages = messages_for(&[
            ("1", "A", 9),
            ("2", "B", 8),
            ("3", "C", 7),
            ("4", "D", 6),
            ("5", "E", 5),
            ("6", "F", 4),
            ("7", "G", 3),
        ]);
        let ranking = TopUsersRanking::compute(&messages, DEFAULT_TOP_N).unwrap();

        assert_eq!(ranking.len(), 5);
        assert_eq!(ranking.threshold(), 5);
        assert_eq!(ranking.total_distinct(), 7);
        let authors: Vec<&str> = ranking.ranked().iter().map(|u| u.author.as_str()).collect();
        assert_eq!(authors, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_ties_at_boundary_are_included() {
        let messages = messages_for(&[
            ("1", "A", 9),
            ("2", "B", 8),
            ("3", "C", 7),
            ("4", "D", 6),
            ("5", "E", 5),
            ("6", "F", 5),
            ("7", "G", 5),
            ("8", "H", 1),
        ]);
        let ranking = TopUsersRanking::compute(&messages, DEFAULT_TOP_N).unwrap();

        assert_eq!(ranking.len(), 7);
        assert!(ranking.ranked().iter().all(|u| u.message_count >= 5));
        assert!(!ranking.ranked().iter().any(|u| u.author == "H"));
    }

    #[test]
    fn test_fewer_groups_than_n() {
        let messages = messages_for(&[("1", "A", 3), ("2", "B", 1)]);
        let ranking = TopUsersRanking::compute(&messages, DEFAULT_TOP_N).unwrap();

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.threshold(), 1);
        assert_eq!(ranking.total_distinct(), 2);
    }

    #[test]
    fn test_single_group() {
        let messages = messages_for(&[("1", "A", 4)]);
        let ranking = TopUsersRanking::compute(&messages, DEFAULT_TOP_N).unwrap();

        assert_eq!(ranking.len(), 1);
        assert!(!ranking.is_empty());
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert!(TopUsersRanking::compute(&[], DEFAULT_TOP_N).is_none());
    }

    #[test]
    fn test_same_id_different_author_are_separate_groups() {
        let messages = messages_for(&[("1", "OldName", 2), ("1", "NewName", 3)]);
        let ranking = TopUsersRanking::compute(&messages, DEFAULT_TOP_N).unwrap();

        assert_eq!(ranking.total_distinct(), 2);
        assert_eq!(ranking.ranked()[0].author, "NewName");
    }

    #[test]
    fn test_display_order_is_ascending() {
        let messages = messages_for(&[("1", "A", 3), ("2", "B", 1), ("3", "C", 2)]);
        let ranking = TopUsersRanking::compute(&messages, DEFAULT_TOP_N).unwrap();

        let counts: Vec<usize> = ranking
            .display_order()
            .iter()
            .map(|u| u.message_count)
            .collect();
        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_n_is_treated_as_one() {
        let messages = messages_for(&[("1", "A", 3), ("2", "B", 3), ("3", "C", 1)]);
        let ranking = TopUsersRanking::compute(&messages, 0).unwrap();

        assert_eq!(ranking.len(), 2);
    }
}
