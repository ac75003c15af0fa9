//! 対話モードのコマンド解釈

use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, warn};

use super::models::ActiveTab;
use super::presenter::Presenter;
use super::session::DashboardSession;
use crate::io::{parse_range_bound, BoundKind};
use crate::ChatboardResult;

pub const HELP_TEXT: &str = "\
コマンド:
  id <値>          送信者IDで絞り込み（値なしで解除）
  author <値>      送信者名の部分一致（大文字小文字を区別しない）
  text <値>        メッセージ本文の部分一致
  start <日時>     開始日時（例: 2024-01-01 または 2024-01-01 09:00）
  end <日時>       終了日時（日付のみならその日の終わりまで）
  clear            すべての条件を解除
  page <n>         指定ページへ移動
  next / prev      前後のページへ移動
  emotes           絵文字対照表を表示
  show             分析画面を表示
  help             このヘルプ
  quit             終了";

/// コマンド解釈エラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Invalid value for '{command}': {value}")]
    InvalidValue { command: String, value: String },
}

/// 対話モードの1コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Id(Option<String>),
    Author(Option<String>),
    Text(Option<String>),
    Start(Option<NaiveDateTime>),
    End(Option<NaiveDateTime>),
    Clear,
    Page(usize),
    Next,
    Prev,
    Emotes,
    Show,
    Help,
    Quit,
}

fn optional_value(rest: &str) -> Option<String> {
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

fn bound(command: &str, rest: &str, kind: BoundKind) -> Result<Option<NaiveDateTime>, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(None);
    }
    parse_range_bound(rest, kind)
        .map(Some)
        .ok_or_else(|| CommandError::InvalidValue {
            command: command.to_string(),
            value: rest.to_string(),
        })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match name.to_lowercase().as_str() {
            "id" => Ok(Self::Id(optional_value(rest))),
            "author" => Ok(Self::Author(optional_value(rest))),
            "text" | "message" => Ok(Self::Text(optional_value(rest))),
            "start" => bound(name, rest, BoundKind::Start).map(Self::Start),
            "end" => bound(name, rest, BoundKind::End).map(Self::End),
            "clear" => Ok(Self::Clear),
            "page" => rest
                .trim()
                .parse()
                .map(Self::Page)
                .map_err(|_| CommandError::InvalidValue {
                    command: name.to_string(),
                    value: rest.trim().to_string(),
                }),
            "next" | "n" => Ok(Self::Next),
            "prev" | "p" => Ok(Self::Prev),
            "emotes" => Ok(Self::Emotes),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

/// コマンドをセッションに適用する。終了コマンドなら`false`
pub fn apply_command(
    session: &mut DashboardSession<'_>,
    command: Command,
    out: &mut dyn Write,
) -> ChatboardResult<bool> {
    let mut criteria = session.criteria().clone();
    match command {
        Command::Id(value) => criteria.id = value,
        Command::Author(value) => criteria.author = value,
        Command::Text(value) => criteria.text = value,
        Command::Start(value) => criteria.start = value,
        Command::End(value) => criteria.end = value,
        Command::Clear => {
            session.clear_filters();
            return Ok(true);
        }
        Command::Page(page) => {
            session.set_page(page);
            return Ok(true);
        }
        Command::Next => {
            session.next_page();
            return Ok(true);
        }
        Command::Prev => {
            session.prev_page();
            return Ok(true);
        }
        Command::Emotes => {
            session.set_active_tab(ActiveTab::EmoteTable);
            return Ok(true);
        }
        Command::Show => {
            session.set_active_tab(ActiveTab::Analytics);
            return Ok(true);
        }
        Command::Help => {
            writeln!(out, "{HELP_TEXT}")?;
            return Ok(true);
        }
        Command::Quit => return Ok(false),
    }

    session.apply_filter(criteria);
    session.set_active_tab(ActiveTab::Analytics);
    Ok(true)
}

fn status_line(session: &DashboardSession<'_>) -> String {
    let view = session.view();
    let period = match (view.filtered_dates.first(), view.filtered_dates.last()) {
        (Some(first), Some(last)) => format!("{first} 〜 {last}"),
        _ => "-".to_string(),
    };
    format!(
        "条件 {} 件 / 該当 {} 行 / 日付 {} / ページ {}",
        session.criteria().active_filter_count(),
        view.filtered.len(),
        period,
        session.current_page()
    )
}

/// 行単位の対話ループ
///
/// 入力が尽きるか`quit`で終了する。解釈できない行はヘルプを表示して読み飛ばす。
pub fn run_interactive(
    session: &mut DashboardSession<'_>,
    presenter: &mut dyn Presenter,
    input: impl BufRead,
    out: &mut dyn Write,
) -> ChatboardResult<()> {
    session.render(presenter)?;
    writeln!(out, "{}", status_line(session))?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Help) => writeln!(out, "{HELP_TEXT}")?,
            Ok(command) => {
                debug!(?command, "⌨️ Command received");
                if !apply_command(session, command, out)? {
                    break;
                }
                session.render(presenter)?;
                writeln!(out, "{}", status_line(session))?;
            }
            Err(CommandError::Unknown(name)) => {
                writeln!(out, "不明なコマンド: {name}")?;
                writeln!(out, "{HELP_TEXT}")?;
            }
            Err(error) => {
                warn!(%error, "Ignoring command");
                writeln!(out, "⚠️ {error}")?;
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    Ok(())
}
