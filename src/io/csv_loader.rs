//! メッセージCSV・絵文字対照表CSVの読み込み

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::datetime::parse_timestamp;
use crate::chat_management::{EmoteEntry, EmoteMap};
use crate::dashboard::models::ChatMessage;

/// 入力ファイル読み込み時のエラー
#[derive(Error, Debug)]
pub enum LoadError {
    /// メッセージファイルが存在しない
    #[error("Messages source not found: {path}")]
    MissingSourceFile { path: String },

    /// 必須カラムがヘッダーに無い
    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// CSVの構造エラー
    #[error("CSV error in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// I/Oエラー
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    fn csv(source_name: &str, source: csv::Error) -> Self {
        Self::Csv {
            source_name: source_name.to_string(),
            source,
        }
    }

    fn missing_column(column: &str, source_name: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            source_name: source_name.to_string(),
        }
    }
}

/// メッセージ読み込み結果
#[derive(Debug, Clone, Default)]
pub struct LoadedMessages {
    pub messages: Vec<ChatMessage>,
    /// 日時を解析できず破棄した行数
    pub dropped_rows: usize,
}

impl LoadedMessages {
    pub fn total_rows(&self) -> usize {
        self.messages.len() + self.dropped_rows
    }
}

/// メッセージCSVのカラム位置
struct MessageColumns {
    id: usize,
    author: usize,
    datetime: usize,
    message: usize,
}

impl MessageColumns {
    fn locate(headers: &StringRecord, source_name: &str) -> Result<Self, LoadError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| LoadError::missing_column(column, source_name))
        };

        Ok(Self {
            id: find("id")?,
            author: find("author")?,
            datetime: find("datetime")?,
            message: find("message")?,
        })
    }
}

/// メッセージCSVファイルを読み込む
pub fn load_messages(path: impl AsRef<Path>, emotes: &EmoteMap) -> Result<LoadedMessages, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::MissingSourceFile {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path)?;
    let loaded = read_messages(file, emotes, &path.display().to_string())?;

    info!(
        path = %path.display(),
        messages = loaded.messages.len(),
        dropped = loaded.dropped_rows,
        "📁 Messages loaded"
    );
    if loaded.dropped_rows > 0 {
        warn!(
            dropped = loaded.dropped_rows,
            "⚠️ Rows without a parseable datetime were dropped"
        );
    }

    Ok(loaded)
}

/// 任意のリーダーからメッセージCSVを読み込む
pub fn read_messages<R: Read>(
    reader: R,
    emotes: &EmoteMap,
    source_name: &str,
) -> Result<LoadedMessages, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::csv(source_name, e))?
        .clone();
    let columns = MessageColumns::locate(&headers, source_name)?;

    let mut loaded = LoadedMessages::default();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::csv(source_name, e))?;
        let field = |index: usize| record.get(index).unwrap_or("");

        let Some(timestamp) = parse_timestamp(field(columns.datetime)) else {
            debug!(row = row + 1, raw = field(columns.datetime), "Dropping row without datetime");
            loaded.dropped_rows += 1;
            continue;
        };

        let text = Some(field(columns.message))
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        loaded.messages.push(ChatMessage::new(
            field(columns.id).trim(),
            field(columns.author),
            timestamp,
            text,
            emotes,
        ));
    }

    Ok(loaded)
}

/// 絵文字対照表CSVを読み込む。ファイルが無い場合は空の対照表を返す
pub fn load_emotes(path: impl AsRef<Path>) -> Result<EmoteMap, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        info!(
            path = %path.display(),
            "Emote table not found, emoji codes will stay as text"
        );
        return Ok(EmoteMap::new());
    }

    let file = File::open(path)?;
    let emotes = read_emotes(file, &path.display().to_string())?;
    info!(path = %path.display(), emotes = emotes.len(), "📁 Emote table loaded");
    Ok(emotes)
}

/// 任意のリーダーから絵文字対照表CSVを読み込む
pub fn read_emotes<R: Read>(reader: R, source_name: &str) -> Result<EmoteMap, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::csv(source_name, e))?
        .clone();
    let position = |column: &str| {
        headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| LoadError::missing_column(column, source_name))
    };
    let code_column = position("emoji")?;
    let link_column = position("link")?;

    let mut emotes = EmoteMap::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::csv(source_name, e))?;
        let code = record.get(code_column).unwrap_or("").trim();
        if code.is_empty() {
            continue;
        }
        let link = record.get(link_column).unwrap_or("").trim();
        emotes.insert(EmoteEntry::new(code, link));
    }

    Ok(emotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGES_CSV: &str = "\
id,author,datetime,message,extra
1,A,2024-01-01 09:00:00,hi :smile:,x
2,B,2024-01-01 09:30:00,yo,x
3,C,not a date,dropped,x
4,D,,also dropped,x
5,E,2024-01-02 10:00:00,,x
";

    const EMOTES_CSV: &str = "\
emoji,link,count
:smile:,http://x/s.png,10
:wave:,http://x/w.png,3
";

    #[test]
    fn test_read_messages_drops_bad_datetimes() {
        let emotes = read_emotes(EMOTES_CSV.as_bytes(), "emotes.csv").unwrap();
        let loaded = read_messages(MESSAGES_CSV.as_bytes(), &emotes, "messages.csv").unwrap();

        assert_eq!(loaded.messages.len(), 3);
        assert_eq!(loaded.dropped_rows, 2);
        assert_eq!(loaded.total_rows(), 5);

        let first = &loaded.messages[0];
        assert_eq!(first.author(), "A");
        assert!(first.display_text().unwrap().contains("http://x/s.png"));

        // 空の本文は本文なしとして扱う
        assert_eq!(loaded.messages[2].text(), None);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "id,author,message\n1,A,hi\n";
        let result = read_messages(csv.as_bytes(), &EmoteMap::new(), "messages.csv");

        assert!(matches!(
            result,
            Err(LoadError::MissingColumn { ref column, .. }) if column == "datetime"
        ));
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "id,author,datetime,message\n1,\"Doe, J\",2024-01-01 00:00:00,\"a, \"\"b\"\"\"\n";
        let loaded = read_messages(csv.as_bytes(), &EmoteMap::new(), "messages.csv").unwrap();

        assert_eq!(loaded.messages[0].author(), "Doe, J");
        assert_eq!(loaded.messages[0].text(), Some("a, \"b\""));
    }

    #[test]
    fn test_read_emotes() {
        let emotes = read_emotes(EMOTES_CSV.as_bytes(), "emotes.csv").unwrap();

        assert_eq!(emotes.len(), 2);
        assert_eq!(emotes.get(":wave:"), Some("http://x/w.png"));
    }

    #[test]
    fn test_missing_emote_file_is_empty_map() {
        let emotes = load_emotes("/definitely/not/here/emotes.csv").unwrap();
        assert!(emotes.is_empty());
    }

    #[test]
    fn test_missing_messages_file_is_error() {
        let result = load_messages("/definitely/not/here/messages.csv", &EmoteMap::new());
        assert!(matches!(result, Err(LoadError::MissingSourceFile { .. })));
    }
}
