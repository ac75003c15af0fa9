// ダッシュボード用ユーティリティ関数

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use super::config_manager::LogConfig;

/// ログ初期化
///
/// `RUST_LOG`が設定されていればそれを優先し、無ければ設定ファイルのレベルを使う。
/// ファイル出力が有効な場合は日次ローテーションのファイルにも書き出し、
/// 返されたガードが破棄されるまで書き込みが続く。
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .or_else(|_| EnvFilter::try_new("info"))?;

    let (file_layer, guard) = if config.enable_file_logging {
        let log_dir = config.resolve_log_dir()?;
        std::fs::create_dir_all(&log_dir)?;

        let appender = tracing_appender::rolling::daily(&log_dir, "chatboard.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json_format {
            fmt::layer().json().with_writer(writer).with_ansi(false).boxed()
        } else {
            fmt::layer().with_writer(writer).with_ansi(false).boxed()
        };
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(env_filter)
        .try_init()?;

    Ok(guard)
}

/// 3桁区切りの数値表記（例: 1,234）
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}

/// 表示幅に収まるよう文字列を切り詰める
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
