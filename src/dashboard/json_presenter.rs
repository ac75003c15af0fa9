//! 機械可読なJSON描画
//!
//! 各セクションを1つのオブジェクトに集め、`finish`で1行のJSONとして書き出す。
//! 期間外のセルは`null`、期間内の空セルは`0`として出力される。

use std::io::Write;

use serde_json::{json, Map, Value};

use super::models::ChatMessage;
use super::pagination::Page;
use super::presenter::Presenter;
use crate::analytics::{DensityGrid, EmoteUsage, TimeSeries, TopUsersRanking};
use crate::ChatboardResult;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct JsonPresenter<W: Write> {
    out: W,
    sections: Map<String, Value>,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sections: Map::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn render_density_grid(&mut self, grid: &DensityGrid) -> ChatboardResult<()> {
        let range = (!grid.is_empty()).then(|| grid.range());
        let cells: Vec<Value> = grid
            .cells()
            .iter()
            .map(|cell| {
                json!({
                    "date": cell.date.to_string(),
                    "hour": cell.hour,
                    "count": cell.count,
                })
            })
            .collect();

        self.sections.insert(
            "density_grid".into(),
            json!({
                "start": range.map(|range| range.start.format(DATETIME_FORMAT).to_string()),
                "end": range.map(|range| range.end.format(DATETIME_FORMAT).to_string()),
                "dates": grid.date_labels_descending().iter().map(ToString::to_string).collect::<Vec<_>>(),
                "max_count": grid.max_count(),
                "cells": cells,
            }),
        );
        Ok(())
    }

    fn render_time_series(&mut self, series: &TimeSeries) -> ChatboardResult<()> {
        let points: Vec<Value> = series
            .points()
            .iter()
            .map(|point| {
                json!({
                    "timestamp": point.timestamp.format(DATETIME_FORMAT).to_string(),
                    "count": point.count,
                })
            })
            .collect();

        self.sections.insert(
            "time_series".into(),
            json!({
                "tick_format": series.tick_format(),
                "points": points,
            }),
        );
        Ok(())
    }

    fn render_ranked_bar(&mut self, ranking: Option<&TopUsersRanking>) -> ChatboardResult<()> {
        let value = match ranking {
            Some(ranking) => json!({
                "total_distinct": ranking.total_distinct(),
                "threshold": ranking.threshold(),
                "users": serde_json::to_value(ranking.display_order())?,
            }),
            None => Value::Null,
        };
        self.sections.insert("top_users".into(), value);
        Ok(())
    }

    fn render_table(&mut self, page: &Page<'_, ChatMessage>) -> ChatboardResult<()> {
        let rows: Vec<Value> = page
            .items
            .iter()
            .map(|message| {
                json!({
                    "id": message.id(),
                    "author": message.author(),
                    "datetime": message.timestamp().format(DATETIME_FORMAT).to_string(),
                    "message": message.text(),
                    "message_html": message.display_text(),
                })
            })
            .collect();

        self.sections.insert(
            "table".into(),
            json!({
                "page": page.number,
                "total_pages": page.total_pages,
                "total_rows": page.total_rows,
                "rows": rows,
            }),
        );
        Ok(())
    }

    fn render_emote_table(&mut self, emotes: &[EmoteUsage]) -> ChatboardResult<()> {
        self.sections
            .insert("emotes".into(), serde_json::to_value(emotes)?);
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> ChatboardResult<()> {
        self.sections.insert("error".into(), Value::from(message));
        Ok(())
    }

    fn finish(&mut self) -> ChatboardResult<()> {
        let document = Value::Object(std::mem::take(&mut self.sections));
        serde_json::to_writer(&mut self.out, &document)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
