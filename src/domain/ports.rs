use crate::domain::model::{
    Companion, CompanionId, Gift, GiftId, GiftOrder, Guest, GuestId, ReservedGift,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// 禮物登記表的存取介面
#[async_trait]
pub trait GiftStore: Send + Sync {
    /// Advisory 快照：目前未被預訂的禮物。僅供顯示，不可作為認領依據。
    async fn available_gifts(&self, order: GiftOrder) -> Result<Vec<Gift>>;

    /// 依 id 讀取禮物（含已預訂的），用於分類未轉移的列
    async fn gifts_by_ids(&self, ids: &BTreeSet<GiftId>) -> Result<Vec<Gift>>;

    /// Filtered update：只更新 `id ∈ ids AND reservado = false` 的列，
    /// 回傳實際轉移的 id。這是防止重複認領的唯一依據。
    async fn claim_unreserved(
        &self,
        ids: &BTreeSet<GiftId>,
        claimant: &GuestId,
    ) -> Result<BTreeSet<GiftId>>;

    /// 已預訂的禮物與認領者名稱，供管理報表使用
    async fn reserved_gifts(&self) -> Result<Vec<ReservedGift>>;

    async fn insert_gift(&self, name: &str) -> Result<GiftId>;
}

/// 賓客與同行者的存取介面
#[async_trait]
pub trait GuestStore: Send + Sync {
    /// 依個人連結的 id 讀取賓客，含同行者名單
    async fn guest(&self, id: &GuestId) -> Result<Option<Guest>>;

    /// 無條件更新，last-write-wins（單一賓客連結，不需要並發保護）
    async fn set_attendance(&self, id: &GuestId, attending: bool) -> Result<()>;

    /// 批次更新同行者出席旗標，限定在指定賓客名下
    async fn set_companion_attendance(
        &self,
        guest: &GuestId,
        ids: &BTreeSet<CompanionId>,
        attending: bool,
    ) -> Result<()>;

    async fn insert_guest(&self, name: &str) -> Result<GuestId>;

    async fn insert_companion(&self, guest: &GuestId, name: &str) -> Result<Companion>;
}

pub trait ConfigProvider: Send + Sync {
    fn store_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn listing_order(&self) -> GiftOrder;
    fn page_size(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
    fn retry_attempts(&self) -> u32;
    fn retry_delay_seconds(&self) -> u64;
}
