//! 日付 × 時間帯のメッセージ密度グリッド
//!
//! 要求された期間のすべての日付について0〜23時のセルを必ず生成する。
//! メッセージのない範囲内のセルは`Some(0)`、期間外のセルは`None`となり、
//! 両者は区別して扱われる。

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dashboard::models::ChatMessage;

/// 1日あたりの時間帯数
pub const HOURS_PER_DAY: u32 = 24;

/// グリッドの対象期間（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl GridRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// 開始日・終了日と時刻から期間を作成
    pub fn from_parts(
        start_date: NaiveDate,
        start_time: NaiveTime,
        end_date: NaiveDate,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            start: start_date.and_time(start_time),
            end: end_date.and_time(end_time),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// 時刻が期間内か（両端を含む）
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// 開始日から終了日までのすべての日付（開始日 > 終了日なら空）
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end_date = self.end_date();
        self.start_date()
            .iter_days()
            .take_while(move |date| *date <= end_date)
    }

    /// 期間に含まれる日数
    pub fn day_count(&self) -> usize {
        let days = (self.end_date() - self.start_date()).num_days();
        usize::try_from(days + 1).unwrap_or(0)
    }
}

/// グリッドの1セル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DensityCell {
    pub date: NaiveDate,
    pub hour: u32,
    /// `date`の`hour`:00として再構成した時刻
    pub timestamp: NaiveDateTime,
    /// `None`: 期間外 / `Some(0)`: 期間内でメッセージなし
    pub count: Option<usize>,
}

impl DensityCell {
    pub fn is_out_of_range(&self) -> bool {
        self.count.is_none()
    }
}

/// 1日分の行（ヒートマップ描画用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub date: NaiveDate,
    pub counts: [Option<usize>; HOURS_PER_DAY as usize],
}

/// 日付 × 時間帯の完全なグリッド
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DensityGrid {
    range: GridRange,
    cells: Vec<DensityCell>,
}

fn slot_timestamp(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour))
}

impl DensityGrid {
    /// フィルター済みメッセージから密度グリッドを構築
    pub fn build(messages: &[ChatMessage], range: GridRange) -> Self {
        // 実際に存在した (日付, 時) の組み合わせのみ集計
        let mut aggregated: HashMap<(NaiveDate, u32), usize> = HashMap::new();
        for message in messages {
            *aggregated
                .entry((message.date(), message.hour()))
                .or_insert(0) += 1;
        }

        let mut cells = Vec::with_capacity(range.day_count() * HOURS_PER_DAY as usize);
        for date in range.dates() {
            for hour in 0..HOURS_PER_DAY {
                let timestamp = slot_timestamp(date, hour);
                let count = range
                    .contains(timestamp)
                    .then(|| aggregated.get(&(date, hour)).copied().unwrap_or(0));

                cells.push(DensityCell {
                    date,
                    hour,
                    timestamp,
                    count,
                });
            }
        }

        tracing::debug!(
            start = %range.start,
            end = %range.end,
            messages = messages.len(),
            cells = cells.len(),
            "📊 Density grid built"
        );

        Self { range, cells }
    }

    /// セルを持たないグリッド（期間を決められない場合）
    pub fn empty(range: GridRange) -> Self {
        Self {
            range,
            cells: Vec::new(),
        }
    }

    pub fn range(&self) -> GridRange {
        self.range
    }

    /// 日付昇順・時昇順のセル一覧
    pub fn cells(&self) -> &[DensityCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 指定した日付・時のセル
    pub fn cell(&self, date: NaiveDate, hour: u32) -> Option<&DensityCell> {
        if hour >= HOURS_PER_DAY {
            return None;
        }
        let offset = usize::try_from((date - self.range.start_date()).num_days()).ok()?;
        self.cells
            .get(offset * HOURS_PER_DAY as usize + hour as usize)
            .filter(|cell| cell.date == date)
    }

    /// 重複のない日付ラベル（昇順）
    pub fn date_labels(&self) -> Vec<NaiveDate> {
        self.cells
            .chunks(HOURS_PER_DAY as usize)
            .filter_map(|day| day.first().map(|cell| cell.date))
            .collect()
    }

    /// 表示用に反転した日付ラベル（降順）
    pub fn date_labels_descending(&self) -> Vec<NaiveDate> {
        let mut labels = self.date_labels();
        labels.reverse();
        labels
    }

    /// 日付ごとに24時間分をまとめた行（昇順）
    pub fn rows(&self) -> Vec<GridRow> {
        self.cells
            .chunks(HOURS_PER_DAY as usize)
            .filter_map(|day| {
                let date = day.first()?.date;
                let mut counts = [None; HOURS_PER_DAY as usize];
                for cell in day {
                    counts[cell.hour as usize] = cell.count;
                }
                Some(GridRow { date, counts })
            })
            .collect()
    }

    /// 期間内セルの最大値
    pub fn max_count(&self) -> Option<usize> {
        self.cells.iter().filter_map(|cell| cell.count).max()
    }

    /// 期間内セルの合計
    pub fn total_count(&self) -> usize {
        self.cells.iter().filter_map(|cell| cell.count).sum()
    }

    /// すべてのセルが期間外か
    pub fn is_all_out_of_range(&self) -> bool {
        self.cells.iter().all(DensityCell::is_out_of_range)
    }
}
