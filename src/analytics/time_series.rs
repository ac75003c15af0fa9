use chrono::NaiveDateTime;
use serde::Serialize;

use super::density_grid::DensityGrid;

/// 時系列の1点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub count: usize,
}

/// メッセージ数の推移（折れ線グラフ用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    points: Vec<TimePoint>,
}

impl TimeSeries {
    /// 密度グリッドから期間外セルを除いた時系列を作成
    pub fn from_grid(grid: &DensityGrid) -> Self {
        let mut points: Vec<TimePoint> = grid
            .cells()
            .iter()
            .filter_map(|cell| {
                cell.count.map(|count| TimePoint {
                    timestamp: cell.timestamp,
                    count,
                })
            })
            .collect();
        points.sort_by_key(|point| point.timestamp);

        Self { points }
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 最もメッセージの多い時点（同数なら最も早い時点）
    pub fn peak(&self) -> Option<&TimePoint> {
        self.points
            .iter()
            .rev()
            .max_by_key(|point| point.count)
    }

    /// 最初と最後の点の日付差が1日を超えるか
    pub fn spans_multiple_days(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp.date() - first.timestamp.date()).num_days() > 1
            }
            _ => false,
        }
    }

    /// X軸ラベルの書式
    pub fn tick_format(&self) -> &'static str {
        if self.spans_multiple_days() {
            "%Y-%m-%d %H:%M"
        } else {
            "%H:%M"
        }
    }
}
