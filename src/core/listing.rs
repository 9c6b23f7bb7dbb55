use crate::core::GiftStore;
use crate::domain::model::{Gift, GiftOrder};
use crate::utils::error::Result;

/// Advisory 禮物清單。
///
/// 這份快照只供顯示，隨時可能過期——認領與否一律以預訂協定的
/// filtered update 為準。呼叫端按需重抓（原站每 6 秒輪詢一次）。
pub struct GiftListing<S: GiftStore> {
    store: S,
    order: GiftOrder,
}

impl<S: GiftStore> GiftListing<S> {
    pub fn new(store: S, order: GiftOrder) -> Self {
        Self { store, order }
    }

    pub fn order(&self) -> GiftOrder {
        self.order
    }

    /// 目前未被預訂的禮物，依設定的鍵排序（確定性，方便測試）
    pub async fn available(&self) -> Result<Vec<Gift>> {
        let gifts = self.store.available_gifts(self.order).await?;
        tracing::debug!("Advisory listing: {} gift(s) available", gifts.len());
        Ok(gifts)
    }
}
