use crate::core::GiftStore;
use crate::domain::model::ReservedGift;
use crate::utils::error::Result;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 管理端的禮物→認領者報表。一次抓全量，分頁在客戶端切，
/// 頁碼從 1 起算，超出範圍夾回有效區間。
#[derive(Debug, Clone)]
pub struct GiftReport {
    rows: Vec<ReservedGift>,
    page_size: usize,
}

impl GiftReport {
    pub fn new(rows: Vec<ReservedGift>, page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
        }
    }

    pub async fn load<S: GiftStore>(store: &S, page_size: usize) -> Result<Self> {
        let rows = store.reserved_gifts().await?;
        tracing::debug!("Gift report loaded: {} reserved gift(s)", rows.len());
        Ok(Self::new(rows, page_size))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    /// 把任意頁碼夾回 1..=page_count（空報表回 1）
    pub fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.page_count().max(1))
    }

    /// 1-indexed 分頁，頁尾不足 page_size 時回傳剩餘的列
    pub fn page(&self, page: usize) -> &[ReservedGift] {
        let page = self.clamp_page(page);
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.rows.len());
        if start >= self.rows.len() {
            return &[];
        }
        &self.rows[start..end]
    }

    pub fn has_next(&self, page: usize) -> bool {
        self.clamp_page(page) < self.page_count()
    }

    pub fn has_prev(&self, page: usize) -> bool {
        self.clamp_page(page) > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GiftId;

    fn rows(n: usize) -> Vec<ReservedGift> {
        (1..=n)
            .map(|i| ReservedGift {
                gift_id: GiftId::new(format!("g{:02}", i)),
                gift_name: format!("Presente {}", i),
                claimant_name: if i % 5 == 0 {
                    None // dangling reservado_por
                } else {
                    Some(format!("Convidado {}", i))
                },
            })
            .collect()
    }

    #[test]
    fn test_pagination_is_one_indexed_with_page_size_10() {
        let report = GiftReport::new(rows(23), DEFAULT_PAGE_SIZE);

        assert_eq!(report.page_count(), 3);
        assert_eq!(report.page(1).len(), 10);
        assert_eq!(report.page(1)[0].gift_name, "Presente 1");
        assert_eq!(report.page(2)[0].gift_name, "Presente 11");
        assert_eq!(report.page(3).len(), 3);
    }

    #[test]
    fn test_forward_back_navigation_flags() {
        let report = GiftReport::new(rows(23), DEFAULT_PAGE_SIZE);

        assert!(!report.has_prev(1));
        assert!(report.has_next(1));
        assert!(report.has_prev(2));
        assert!(report.has_next(2));
        assert!(report.has_prev(3));
        assert!(!report.has_next(3));
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let report = GiftReport::new(rows(15), DEFAULT_PAGE_SIZE);

        assert_eq!(report.clamp_page(0), 1);
        assert_eq!(report.clamp_page(99), 2);
        assert_eq!(report.page(99).len(), 5);
        assert_eq!(report.page(0)[0].gift_name, "Presente 1");
    }

    #[test]
    fn test_empty_report() {
        let report = GiftReport::new(Vec::new(), DEFAULT_PAGE_SIZE);

        assert!(report.is_empty());
        assert_eq!(report.page_count(), 0);
        assert_eq!(report.clamp_page(1), 1);
        assert!(report.page(1).is_empty());
        assert!(!report.has_next(1));
        assert!(!report.has_prev(1));
    }

    #[test]
    fn test_dangling_claimant_surfaces_as_none() {
        let report = GiftReport::new(rows(5), DEFAULT_PAGE_SIZE);
        assert_eq!(report.page(1)[4].claimant_name, None);
    }

    #[test]
    fn test_zero_page_size_is_clamped_to_one() {
        let report = GiftReport::new(rows(3), 0);
        assert_eq!(report.page_size(), 1);
        assert_eq!(report.page_count(), 3);
    }
}
