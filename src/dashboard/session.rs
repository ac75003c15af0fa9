//! ダッシュボードのセッション状態
//!
//! フィルター条件とページ番号を保持し、条件が変わるたびに
//! 表示用の集計結果（`DashboardView`）を丸ごと作り直す。

use chrono::NaiveDate;
use tracing::{debug, info};

use super::app_context::AppContext;
use super::models::{ActiveTab, ChatMessage};
use super::pagination::{Page, Pagination};
use super::presenter::Presenter;
use crate::analytics::{DensityGrid, GridRange, TimeSeries, TopUsersRanking};
use crate::chat_management::FilterCriteria;
use crate::ChatboardResult;

/// 1回の再計算で得られる表示データ
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filtered: Vec<ChatMessage>,
    pub grid: DensityGrid,
    pub series: TimeSeries,
    pub ranking: Option<TopUsersRanking>,
    /// 日付選択肢（絞り込み結果が空ならデータ全体の日付）
    pub filtered_dates: Vec<NaiveDate>,
}

fn distinct_dates(messages: &[ChatMessage]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = messages.iter().map(ChatMessage::date).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

impl DashboardView {
    fn compute(context: &AppContext, criteria: &FilterCriteria) -> Self {
        let filtered = criteria.filter_messages(context.messages());

        let grid = match context.resolve_range(criteria) {
            Some(range) => DensityGrid::build(&filtered, range),
            None => {
                let at = chrono::NaiveDateTime::MIN;
                DensityGrid::empty(GridRange::new(at, at))
            }
        };
        let series = TimeSeries::from_grid(&grid);
        let ranking = TopUsersRanking::compute(&filtered, context.display().top_n);

        let filtered_dates = if filtered.is_empty() {
            distinct_dates(context.messages())
        } else {
            distinct_dates(&filtered)
        };

        Self {
            filtered,
            grid,
            series,
            ranking,
            filtered_dates,
        }
    }
}

/// 対話的なダッシュボードセッション
pub struct DashboardSession<'a> {
    context: &'a AppContext,
    criteria: FilterCriteria,
    current_page: usize,
    active_tab: ActiveTab,
    view: DashboardView,
}

impl<'a> DashboardSession<'a> {
    /// 条件なしの状態でセッションを開始
    pub fn new(context: &'a AppContext) -> Self {
        Self::with_criteria(context, FilterCriteria::default())
    }

    pub fn with_criteria(context: &'a AppContext, criteria: FilterCriteria) -> Self {
        let view = DashboardView::compute(context, &criteria);
        Self {
            context,
            criteria,
            current_page: 1,
            active_tab: ActiveTab::default(),
            view,
        }
    }

    /// フィルター条件を適用して全体を再計算する（ページは1に戻る）
    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.view = DashboardView::compute(self.context, &criteria);
        self.criteria = criteria;
        self.current_page = 1;

        info!(
            filters = self.criteria.active_filter_count(),
            rows = self.view.filtered.len(),
            "🔍 Filter applied"
        );
    }

    /// 条件をすべて解除する
    pub fn clear_filters(&mut self) {
        self.apply_filter(FilterCriteria::default());
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn context(&self) -> &AppContext {
        self.context
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.view.filtered.len(), self.context.display().rows_per_page)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// ページを移動する。範囲外の番号は1ページ目になる
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = self.pagination().clamp_page(page);
        debug!(page = self.current_page, "📄 Page changed");
        self.current_page
    }

    /// 次のページ（最終ページではそのまま）
    pub fn next_page(&mut self) -> usize {
        let total = self.pagination().total_pages();
        if self.current_page < total {
            self.set_page(self.current_page + 1)
        } else {
            self.current_page
        }
    }

    /// 前のページ（1ページ目ではそのまま）
    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_sub(1).max(1))
    }

    /// 現在のページの行
    pub fn page(&self) -> Page<'_, ChatMessage> {
        self.pagination().page(&self.view.filtered, self.current_page)
    }

    /// 表示中のタブを描画する
    pub fn render(&self, presenter: &mut dyn Presenter) -> ChatboardResult<()> {
        match self.active_tab {
            ActiveTab::Analytics => {
                presenter.render_density_grid(&self.view.grid)?;
                presenter.render_time_series(&self.view.series)?;
                presenter.render_ranked_bar(self.view.ranking.as_ref())?;
                presenter.render_table(&self.page())?;
            }
            ActiveTab::EmoteTable => self.render_emotes(presenter)?,
        }
        presenter.finish()
    }

    /// 絵文字対照表を描画する
    pub fn render_emotes(&self, presenter: &mut dyn Presenter) -> ChatboardResult<()> {
        presenter.render_emote_table(&self.context.emote_usage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::EmoteUsage;
    use crate::chat_management::EmoteMap;
    use crate::dashboard::config_manager::DisplayConfig;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn context(rows_per_page: usize) -> AppContext {
        let emotes = EmoteMap::new();
        let messages = vec![
            ChatMessage::new("1", "A", ts("2024-01-01 09:10"), Some("hi".into()), &emotes),
            ChatMessage::new("1", "A", ts("2024-01-01 09:40"), Some("again".into()), &emotes),
            ChatMessage::new("2", "B", ts("2024-01-01 11:05"), Some("yo".into()), &emotes),
            ChatMessage::new("3", "C", ts("2024-01-03 20:00"), None, &emotes),
        ];
        let display = DisplayConfig {
            rows_per_page,
            ..DisplayConfig::default()
        };
        AppContext::from_parts(messages, emotes, display)
    }

    /// 呼ばれた描画の順序を記録する
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Presenter for Recorder {
        fn render_density_grid(&mut self, grid: &DensityGrid) -> ChatboardResult<()> {
            self.calls.push(format!("grid:{}", grid.len()));
            Ok(())
        }

        fn render_time_series(&mut self, series: &TimeSeries) -> ChatboardResult<()> {
            self.calls.push(format!("series:{}", series.len()));
            Ok(())
        }

        fn render_ranked_bar(&mut self, ranking: Option<&TopUsersRanking>) -> ChatboardResult<()> {
            self.calls
                .push(format!("ranking:{}", ranking.map_or(0, TopUsersRanking::len)));
            Ok(())
        }

        fn render_table(&mut self, page: &Page<'_, ChatMessage>) -> ChatboardResult<()> {
            self.calls
                .push(format!("table:{}/{}", page.number, page.total_pages));
            Ok(())
        }

        fn render_emote_table(&mut self, emotes: &[EmoteUsage]) -> ChatboardResult<()> {
            self.calls.push(format!("emotes:{}", emotes.len()));
            Ok(())
        }

        fn render_error(&mut self, message: &str) -> ChatboardResult<()> {
            self.calls.push(format!("error:{message}"));
            Ok(())
        }
    }

    #[test]
    fn test_initial_view_covers_dataset() {
        let context = context(10);
        let session = DashboardSession::new(&context);
        let view = session.view();

        assert_eq!(view.filtered.len(), 4);
        // 1/1〜1/3 の3日 × 24時間
        assert_eq!(view.grid.len(), 72);
        assert_eq!(view.series.len(), 72);
        assert_eq!(view.filtered_dates.len(), 2);
        assert_eq!(view.ranking.as_ref().unwrap().ranked()[0].author, "A");
    }

    #[test]
    fn test_apply_filter_recomputes_and_resets_page() {
        let context = context(1);
        let mut session = DashboardSession::new(&context);
        assert_eq!(session.set_page(3), 3);

        session.apply_filter(FilterCriteria::new().with_author("a"));
        let view = session.view();

        assert_eq!(session.current_page(), 1);
        assert_eq!(view.filtered.len(), 2);
        assert_eq!(view.grid.total_count(), 2);
        assert_eq!(
            view.filtered_dates,
            vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()]
        );
        // 期間は引き続きデータ全体
        assert_eq!(view.grid.len(), 72);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let context = context(10);
        let mut session = DashboardSession::new(&context);
        session.apply_filter(FilterCriteria::new().with_text("nothing matches this"));

        let view = session.view();
        assert!(view.filtered.is_empty());
        assert!(view.ranking.is_none());
        // 日付選択肢はデータ全体にフォールバックする
        assert_eq!(
            view.filtered_dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
        assert_eq!(view.grid.total_count(), 0);

        let mut recorder = Recorder::default();
        session.render(&mut recorder).unwrap();
        assert_eq!(
            recorder.calls,
            vec!["grid:72", "series:72", "ranking:0", "table:1/1"]
        );
    }

    #[test]
    fn test_single_message_without_match_keeps_its_date() {
        let emotes = EmoteMap::new();
        let messages = vec![ChatMessage::new(
            "1",
            "A",
            ts("2024-01-01 09:00"),
            Some("hello".into()),
            &emotes,
        )];
        let context = AppContext::from_parts(messages, emotes, DisplayConfig::default());
        let session =
            DashboardSession::with_criteria(&context, FilterCriteria::new().with_text("nomatch"));

        assert!(session.view().filtered.is_empty());
        assert_eq!(
            session.view().filtered_dates,
            vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()]
        );
    }

    #[test]
    fn test_time_range_marks_cells_out_of_range() {
        let context = context(10);
        let mut session = DashboardSession::new(&context);
        session.apply_filter(
            FilterCriteria::new()
                .with_time_range(Some(ts("2024-01-01 10:00")), Some(ts("2024-01-01 12:00"))),
        );

        let view = session.view();
        assert_eq!(view.filtered.len(), 1);
        assert_eq!(view.grid.len(), 24);
        assert_eq!(view.series.len(), 3);
        assert!(view.grid.cells()[9].is_out_of_range());
    }

    #[test]
    fn test_page_navigation() {
        let context = context(3);
        let mut session = DashboardSession::new(&context);

        assert_eq!(session.prev_page(), 1);
        assert_eq!(session.next_page(), 2);
        assert_eq!(session.next_page(), 2);
        assert_eq!(session.page().items.len(), 1);
        assert_eq!(session.set_page(9), 1);
    }

    #[test]
    fn test_render_emote_tab() {
        let context = context(10);
        let mut session = DashboardSession::new(&context);
        session.set_active_tab(ActiveTab::EmoteTable);

        let mut recorder = Recorder::default();
        session.render(&mut recorder).unwrap();
        assert_eq!(recorder.calls, vec!["emotes:0"]);
    }

    #[test]
    fn test_clear_filters() {
        let context = context(10);
        let mut session = DashboardSession::new(&context);
        session.apply_filter(FilterCriteria::new().with_id("2"));
        assert_eq!(session.view().filtered.len(), 1);

        session.clear_filters();
        assert!(!session.criteria().is_active());
        assert_eq!(session.view().filtered.len(), 4);
    }
}
