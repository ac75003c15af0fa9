use serde::Serialize;
use std::collections::HashMap;

use crate::chat_management::EmoteMap;
use crate::dashboard::models::ChatMessage;

/// 絵文字対照表の1行と使用回数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmoteUsage {
    pub code: String,
    pub asset_url: String,
    pub usage_count: usize,
}

/// 全メッセージ中の絵文字コード使用回数を集計（対照表のファイル順）
pub fn compute_emote_usage(emotes: &EmoteMap, messages: &[ChatMessage]) -> Vec<EmoteUsage> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in messages.iter().filter_map(ChatMessage::text) {
        emotes.count_codes(text, &mut counts);
    }

    emotes
        .entries()
        .iter()
        .map(|entry| EmoteUsage {
            code: entry.code.clone(),
            asset_url: entry.asset_url.clone(),
            usage_count: counts.get(&entry.code).copied().unwrap_or(0),
        })
        .collect()
}
