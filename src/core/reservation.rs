use crate::core::GiftStore;
use crate::domain::model::{GiftId, GuestId, ReservationOutcome};
use crate::utils::error::Result;
use std::collections::BTreeSet;

/// 禮物預訂協定。
///
/// 正確性完全依賴 store 端的 filtered update：`reservado = false` 寫在
/// 更新謂詞裡，由 store 逐列原子判斷並套用。兩個賓客同時搶同一件禮物
/// 時，最多只有一方會看到該列轉移成功。這裡絕不先讀再無條件寫——
/// advisory 清單只拿來顯示，不拿來做認領決定。
pub struct ReservationProtocol<S: GiftStore> {
    store: S,
}

impl<S: GiftStore> ReservationProtocol<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 替一位賓客認領一組禮物。
    ///
    /// - 空集合是 no-op：不碰 store，直接回傳空結果。
    /// - `claimed` 含本次轉移的列，加上先前已由同一人認領的列（重送冪等，
    ///   不報錯也不重複計數）。
    /// - `lost` 是已被其他人搶走的列——部分失敗，不是硬錯誤，呼叫端
    ///   應重新整理 advisory 清單再讓使用者重選。
    pub async fn reserve(
        &self,
        gift_ids: &BTreeSet<GiftId>,
        claimant: &GuestId,
    ) -> Result<ReservationOutcome> {
        if gift_ids.is_empty() {
            tracing::debug!("Empty reservation request, skipping store call");
            return Ok(ReservationOutcome::default());
        }

        let transitioned = self.store.claim_unreserved(gift_ids, claimant).await?;
        tracing::info!(
            "Reservation for {}: {}/{} gifts transitioned",
            claimant,
            transitioned.len(),
            gift_ids.len()
        );

        let mut outcome = ReservationOutcome {
            claimed: transitioned,
            lost: BTreeSet::new(),
        };

        let leftover: BTreeSet<GiftId> = gift_ids
            .iter()
            .filter(|id| !outcome.claimed.contains(*id))
            .cloned()
            .collect();
        if leftover.is_empty() {
            return Ok(outcome);
        }

        // 未轉移的列需要分類：filtered update 分不出「本來就是我的」和
        // 「被別人搶走」，補一次讀。認領決定仍然只在上面的寫入發生。
        let rows = self.store.gifts_by_ids(&leftover).await?;
        let mut seen: BTreeSet<GiftId> = BTreeSet::new();
        for gift in rows {
            seen.insert(gift.id.clone());
            if gift.reserved_by.as_ref() == Some(claimant) {
                outcome.claimed.insert(gift.id);
            } else {
                outcome.lost.insert(gift.id);
            }
        }

        // store 不認得的 id 也算失敗
        for id in leftover {
            if !seen.contains(&id) {
                outcome.lost.insert(id);
            }
        }

        if !outcome.is_complete() {
            tracing::warn!(
                "Partial reservation failure for {}: {} gift(s) already taken",
                claimant,
                outcome.lost.len()
            );
        }

        Ok(outcome)
    }
}
