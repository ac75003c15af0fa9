//! 描画アダプターの抽象インタフェース
//!
//! 集計結果（グリッド・時系列・ランキング・表）を受け取り、
//! 端末やJSONなど具体的な出力形式に変換する。

use crate::analytics::{DensityGrid, EmoteUsage, TimeSeries, TopUsersRanking};
use crate::dashboard::models::ChatMessage;
use crate::dashboard::pagination::Page;
use crate::ChatboardResult;

/// 描画アダプター
pub trait Presenter {
    /// 日付 × 時間帯のヒートマップ
    fn render_density_grid(&mut self, grid: &DensityGrid) -> ChatboardResult<()>;

    /// メッセージ数推移の折れ線グラフ
    fn render_time_series(&mut self, series: &TimeSeries) -> ChatboardResult<()>;

    /// 上位ユーザーの横棒グラフ。`None`はデータなし
    fn render_ranked_bar(&mut self, ranking: Option<&TopUsersRanking>) -> ChatboardResult<()>;

    /// メッセージ一覧の1ページ
    fn render_table(&mut self, page: &Page<'_, ChatMessage>) -> ChatboardResult<()>;

    /// 絵文字対照表
    fn render_emote_table(&mut self, emotes: &[EmoteUsage]) -> ChatboardResult<()>;

    /// 画面全体を置き換えるエラー表示
    fn render_error(&mut self, message: &str) -> ChatboardResult<()>;

    /// 1回分の描画を確定する
    fn finish(&mut self) -> ChatboardResult<()> {
        Ok(())
    }
}
