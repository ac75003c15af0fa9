use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chatboard::{
    dashboard::{
        run_interactive, utils, ActiveTab, AppConfig, AppContext, ConfigManager, DashboardSession,
        JsonPresenter, Presenter, TextPresenter,
    },
    io::{parse_range_bound, BoundKind},
    FilterCriteria, LoadError,
};
use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// チャットログ分析ダッシュボード
#[derive(Parser, Debug)]
#[command(name = "chatboard", version, about = "Chat log analytics dashboard")]
struct Cli {
    /// 設定ファイル（省略時はXDG設定ディレクトリのconfig.toml）
    #[arg(long)]
    config: Option<PathBuf>,

    /// メッセージCSV
    #[arg(long)]
    messages: Option<PathBuf>,

    /// 絵文字対照表CSV
    #[arg(long)]
    emotes: Option<PathBuf>,

    /// 送信者ID（完全一致）
    #[arg(long)]
    id: Option<String>,

    /// 送信者名（部分一致・大文字小文字を区別しない）
    #[arg(long)]
    author: Option<String>,

    /// メッセージ本文（部分一致・大文字小文字を区別しない）
    #[arg(long)]
    message: Option<String>,

    /// 開始日時
    #[arg(long, value_parser = parse_start)]
    start: Option<NaiveDateTime>,

    /// 終了日時（日付のみならその日の終わりまで）
    #[arg(long, value_parser = parse_end)]
    end: Option<NaiveDateTime>,

    /// 表示するページ
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// 出力形式
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// 絵文字対照表タブを表示
    #[arg(long)]
    emotes_tab: bool,

    /// 対話モードで起動
    #[arg(short, long)]
    interactive: bool,

    /// ログレベル
    #[arg(long)]
    log_level: Option<String>,

    /// 1ページあたりの行数
    #[arg(long)]
    rows_per_page: Option<usize>,

    /// 上位ユーザーの表示人数
    #[arg(long)]
    top_n: Option<usize>,
}

fn parse_start(raw: &str) -> Result<NaiveDateTime, String> {
    parse_range_bound(raw, BoundKind::Start).ok_or_else(|| format!("invalid datetime: {raw}"))
}

fn parse_end(raw: &str) -> Result<NaiveDateTime, String> {
    parse_range_bound(raw, BoundKind::End).ok_or_else(|| format!("invalid datetime: {raw}"))
}

impl Cli {
    /// コマンドライン引数で設定を上書き
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(path) = &self.messages {
            config.data.messages_path = path.clone();
        }
        if let Some(path) = &self.emotes {
            config.data.emotes_path = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.log.log_level = level.clone();
        }
        if let Some(rows) = self.rows_per_page {
            config.display.rows_per_page = rows;
        }
        if let Some(top_n) = self.top_n {
            config.display.top_n = top_n;
        }
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            id: self.id.clone(),
            author: self.author.clone(),
            text: self.message.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = config_manager.load_config()?;
    cli.apply_overrides(&mut config);

    let _guard = utils::init_logging(&config.log)?;
    tracing::info!("🎬 Starting chatboard");

    let mut presenter: Box<dyn Presenter> = match cli.format {
        OutputFormat::Text => Box::new(TextPresenter::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonPresenter::new(io::stdout())),
    };

    let context = match AppContext::load(&config.data, &config.display) {
        Ok(context) => context,
        Err(error @ LoadError::MissingSourceFile { .. }) => {
            tracing::error!(%error, "❌ Messages source is missing");
            presenter.render_error(&error.to_string())?;
            presenter.finish()?;
            return Ok(ExitCode::FAILURE);
        }
        Err(error) => {
            return Err(error).context("Failed to load dashboard data");
        }
    };

    let mut session = DashboardSession::with_criteria(&context, cli.criteria());
    session.set_page(cli.page);
    if cli.emotes_tab {
        session.set_active_tab(ActiveTab::EmoteTable);
    }

    if cli.interactive {
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        run_interactive(&mut session, presenter.as_mut(), stdin.lock(), &mut stderr)?;
    } else {
        session.render(presenter.as_mut())?;
    }

    tracing::info!("👋 chatboard finished");
    Ok(ExitCode::SUCCESS)
}
