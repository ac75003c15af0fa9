//! 端末向けのテキスト描画

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{NaiveDate, Timelike};

use super::models::ChatMessage;
use super::pagination::Page;
use super::presenter::Presenter;
use super::utils::{format_count, truncate_chars};
use crate::analytics::{DensityGrid, EmoteUsage, TimeSeries, TopUsersRanking, HOURS_PER_DAY};
use crate::ChatboardResult;

const HEAT_GLYPHS: [&str; 4] = ["░░", "▒▒", "▓▓", "██"];
const SPARK_GLYPHS: [char; 7] = ['▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_WIDTH: usize = 40;
const AUTHOR_WIDTH: usize = 16;
const MESSAGE_WIDTH: usize = 60;

/// 0..=max を 1..=levels の段階に割り当てる（0は0段階）
fn scale(count: usize, max: usize, levels: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    (count * levels).div_ceil(max).clamp(1, levels)
}

/// テキスト描画アダプター
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heat_cell(count: Option<usize>, max: usize) -> &'static str {
        match count {
            None => "  ",
            Some(0) => "· ",
            Some(count) => HEAT_GLYPHS[scale(count, max, HEAT_GLYPHS.len()) - 1],
        }
    }

    fn spark_glyph(count: usize, max: usize) -> char {
        match scale(count, max, SPARK_GLYPHS.len()) {
            0 => '▁',
            level => SPARK_GLYPHS[level - 1],
        }
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render_density_grid(&mut self, grid: &DensityGrid) -> ChatboardResult<()> {
        writeln!(self.out, "📊 日付 × 時間帯 ヒートマップ")?;
        if grid.is_empty() {
            writeln!(self.out, "  (表示する期間がありません)")?;
            writeln!(self.out)?;
            return Ok(());
        }

        let header: String = (0..HOURS_PER_DAY)
            .step_by(3)
            .map(|hour| format!("{:<6}", format!("{hour}:00")))
            .collect();
        writeln!(self.out, "{:<11}{}", "", header.trim_end())?;

        let max = grid.max_count().unwrap_or(0);
        for row in grid.rows() {
            let cells: String = row
                .counts
                .iter()
                .map(|&count| Self::heat_cell(count, max))
                .collect();
            writeln!(self.out, "{} {}", row.date.format("%Y-%m-%d"), cells.trim_end())?;
        }
        writeln!(
            self.out,
            "凡例: 空白=期間外  ·=0  ░▒▓█=少→多 (最大 {} 件)",
            format_count(max)
        )?;
        writeln!(self.out)?;
        Ok(())
    }

    fn render_time_series(&mut self, series: &TimeSeries) -> ChatboardResult<()> {
        writeln!(self.out, "📈 メッセージ数の推移")?;
        let Some(peak) = series.peak() else {
            writeln!(self.out, "  (データなし)")?;
            writeln!(self.out)?;
            return Ok(());
        };

        let max = peak.count;
        let mut days: BTreeMap<NaiveDate, [Option<usize>; HOURS_PER_DAY as usize]> =
            BTreeMap::new();
        for point in series.points() {
            days.entry(point.timestamp.date())
                .or_insert([None; HOURS_PER_DAY as usize])[point.timestamp.hour() as usize] =
                Some(point.count);
        }

        for (date, counts) in &days {
            let line: String = counts
                .iter()
                .map(|count| count.map_or(' ', |count| Self::spark_glyph(count, max)))
                .collect();
            writeln!(self.out, "{} {}", date.format("%Y-%m-%d"), line.trim_end())?;
        }
        writeln!(
            self.out,
            "ピーク: {} ({} 件)",
            peak.timestamp.format(series.tick_format()),
            format_count(peak.count)
        )?;
        writeln!(self.out)?;
        Ok(())
    }

    fn render_ranked_bar(&mut self, ranking: Option<&TopUsersRanking>) -> ChatboardResult<()> {
        let Some(ranking) = ranking else {
            writeln!(
                self.out,
                "⚠️ 現在の条件では上位ユーザーを表示できるデータがありません。条件を調整してください。"
            )?;
            writeln!(self.out)?;
            return Ok(());
        };

        writeln!(
            self.out,
            "🏆 発言数の多いユーザー (全 {} 人)",
            format_count(ranking.total_distinct())
        )?;
        let max = ranking
            .ranked()
            .first()
            .map_or(0, |user| user.message_count);
        // 昇順の表示順を下から積み上げるため、上から順に出力するときは逆順
        for user in ranking.display_order().into_iter().rev() {
            let width = scale(user.message_count, max, BAR_WIDTH);
            writeln!(
                self.out,
                "{:<width$} {} {}",
                truncate_chars(&user.author, AUTHOR_WIDTH),
                "█".repeat(width),
                format_count(user.message_count),
                width = AUTHOR_WIDTH
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn render_table(&mut self, page: &Page<'_, ChatMessage>) -> ChatboardResult<()> {
        writeln!(self.out, "📋 メッセージ一覧")?;
        writeln!(
            self.out,
            "フィルター後 {} 件",
            format_count(page.total_rows)
        )?;
        writeln!(
            self.out,
            "{:<12} {:<width$} {:<19} message",
            "id",
            "author",
            "datetime",
            width = AUTHOR_WIDTH
        )?;
        for message in page.items {
            writeln!(
                self.out,
                "{:<12} {:<width$} {:<19} {}",
                truncate_chars(message.id().as_str(), 12),
                truncate_chars(message.author(), AUTHOR_WIDTH),
                message.timestamp().format("%Y-%m-%d %H:%M:%S"),
                truncate_chars(message.text().unwrap_or(""), MESSAGE_WIDTH),
                width = AUTHOR_WIDTH
            )?;
        }
        writeln!(
            self.out,
            "ページ {} / {}",
            format_count(page.number),
            format_count(page.total_pages)
        )?;
        writeln!(self.out)?;
        Ok(())
    }

    fn render_emote_table(&mut self, emotes: &[EmoteUsage]) -> ChatboardResult<()> {
        writeln!(self.out, "🎨 絵文字対照表")?;
        if emotes.is_empty() {
            writeln!(self.out, "  (データなし)")?;
            return Ok(());
        }
        for emote in emotes {
            writeln!(
                self.out,
                "{:<32} {:>8}  {}",
                emote.code,
                format_count(emote.usage_count),
                emote.asset_url
            )?;
        }
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> ChatboardResult<()> {
        writeln!(self.out, "❌ {message}")?;
        Ok(())
    }

    fn finish(&mut self) -> ChatboardResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
