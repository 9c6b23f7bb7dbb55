use crate::core::GuestStore;
use crate::domain::model::{CompanionId, Guest, GuestId};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::validate_non_empty_string;
use std::collections::BTreeSet;

/// 同行者更新的摘要，回報哪些被翻成出席、哪些被翻成缺席
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanionUpdate {
    pub attending: BTreeSet<CompanionId>,
    pub not_attending: BTreeSet<CompanionId>,
}

/// 出席確認流程（低嚴謹路徑）。
///
/// 與預訂協定不同，這裡全是無條件更新、last-write-wins：一個賓客連結
/// 只會有一個人提交，不需要並發保護。
pub struct RsvpService<S: GuestStore> {
    store: S,
}

impl<S: GuestStore> RsvpService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn guest(&self, id: &GuestId) -> Result<Option<Guest>> {
        self.store.guest(id).await
    }

    /// 無條件寫入賓客本人的出席狀態
    pub async fn set_attendance(&self, guest_id: &GuestId, attending: bool) -> Result<()> {
        self.store.set_attendance(guest_id, attending).await?;
        tracing::info!("Attendance for {} set to {}", guest_id, attending);
        Ok(())
    }

    /// 同行者出席是 full-replace：`attending_ids` 裡的翻成出席，名單上
    /// 其餘的一律翻成缺席——即使這次提交沒有提到他們。部分名單會把
    /// 其他人覆蓋成缺席，呼叫端必須每次都送完整的出席集合。
    pub async fn set_companion_attendance(
        &self,
        guest_id: &GuestId,
        attending_ids: &BTreeSet<CompanionId>,
    ) -> Result<CompanionUpdate> {
        let guest = self
            .store
            .guest(guest_id)
            .await?
            .ok_or_else(|| SiteError::ValidationError {
                field: "rsvp.id".to_string(),
                message: format!("Guest {} not found", guest_id),
            })?;

        self.replace_companion_attendance(&guest, attending_ids).await
    }

    /// 「送出回覆」按鈕的完整流程：賓客出席 + 同行者 full-replace。
    /// 名字為空白的記錄擋在任何寫入之前（advisory 的前端驗證）。
    pub async fn submit_rsvp(
        &self,
        guest_id: &GuestId,
        attending: bool,
        attending_companions: &BTreeSet<CompanionId>,
    ) -> Result<CompanionUpdate> {
        let guest = self
            .store
            .guest(guest_id)
            .await?
            .ok_or_else(|| SiteError::ValidationError {
                field: "rsvp.id".to_string(),
                message: format!("Guest {} not found", guest_id),
            })?;
        validate_non_empty_string("rsvp.nome", &guest.name)?;

        self.store.set_attendance(guest_id, attending).await?;
        let update = self
            .replace_companion_attendance(&guest, attending_companions)
            .await?;

        tracing::info!(
            "RSVP submitted for {}: attending={}, companions {}/{} attending",
            guest_id,
            attending,
            update.attending.len(),
            guest.companions.len()
        );
        Ok(update)
    }

    /// 臨時賓客（沒有個人連結）先留名再預訂。名字不可空白。
    pub async fn register_walkup(&self, name: &str) -> Result<GuestId> {
        validate_non_empty_string("rsvp.nome", name)?;
        let id = self.store.insert_guest(name.trim()).await?;
        tracing::info!("Walk-up guest '{}' registered as {}", name.trim(), id);
        Ok(id)
    }

    async fn replace_companion_attendance(
        &self,
        guest: &Guest,
        attending_ids: &BTreeSet<CompanionId>,
    ) -> Result<CompanionUpdate> {
        let roster = guest.companion_ids();

        // 只接受名單上存在的 id，提交裡的陌生 id 直接忽略
        let attending: BTreeSet<CompanionId> = attending_ids
            .iter()
            .filter(|id| roster.contains(*id))
            .cloned()
            .collect();
        let not_attending: BTreeSet<CompanionId> =
            roster.difference(&attending).cloned().collect();

        self.store
            .set_companion_attendance(&guest.id, &attending, true)
            .await?;
        self.store
            .set_companion_attendance(&guest.id, &not_attending, false)
            .await?;

        Ok(CompanionUpdate {
            attending,
            not_attending,
        })
    }
}
