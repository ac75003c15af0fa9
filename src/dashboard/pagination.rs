use serde::Serialize;

/// ページ分割の計算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total_rows: usize,
    rows_per_page: usize,
}

/// 1ページ分の表示データ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1始まりのページ番号
    pub number: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl Pagination {
    pub fn new(total_rows: usize, rows_per_page: usize) -> Self {
        Self {
            total_rows,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// 総ページ数（データが無くても1ページ）
    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.rows_per_page).max(1)
    }

    /// 範囲外のページ番号は1ページ目に戻す
    pub fn clamp_page(&self, page: usize) -> usize {
        if page == 0 || page > self.total_pages() {
            1
        } else {
            page
        }
    }

    /// 指定ページの行を切り出す
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> Page<'a, T> {
        let number = self.clamp_page(page);
        let start = ((number - 1) * self.rows_per_page).min(items.len());
        let end = (start + self.rows_per_page).min(items.len());

        Page {
            items: &items[start..end],
            number,
            total_pages: self.total_pages(),
            total_rows: self.total_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(0, 10).total_pages(), 1);
        assert_eq!(Pagination::new(10, 10).total_pages(), 1);
        assert_eq!(Pagination::new(11, 10).total_pages(), 2);
        assert_eq!(Pagination::new(95, 10).total_pages(), 10);
    }

    #[test]
    fn test_page_slices() {
        let rows: Vec<usize> = (0..25).collect();
        let pagination = Pagination::new(rows.len(), 10);

        let page = pagination.page(&rows, 3);
        assert_eq!(page.items, &[20, 21, 22, 23, 24]);
        assert_eq!(page.number, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_rows, 25);
    }

    #[test]
    fn test_out_of_range_page_is_clamped_to_first() {
        let rows: Vec<usize> = (0..25).collect();
        let pagination = Pagination::new(rows.len(), 10);

        assert_eq!(pagination.page(&rows, 4).number, 1);
        assert_eq!(pagination.page(&rows, 0).number, 1);
        assert_eq!(pagination.page(&rows, 99).items[0], 0);
    }

    #[test]
    fn test_empty_rows() {
        let rows: Vec<usize> = Vec::new();
        let page = Pagination::new(0, 10).page(&rows, 1);

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_zero_rows_per_page() {
        let pagination = Pagination::new(3, 0);
        assert_eq!(pagination.rows_per_page(), 1);
        assert_eq!(pagination.total_pages(), 3);
    }
}
