use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

id_type!(GiftId);
id_type!(GuestId);
id_type!(CompanionId);

/// 禮物清單的一筆記錄（presentes 表）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gift {
    pub id: GiftId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "reservado", default)]
    pub reserved: bool,
    #[serde(rename = "reservado_por", default)]
    pub reserved_by: Option<GuestId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Gift {
    pub fn is_available(&self) -> bool {
        // 不變式：reservado == false ⇔ reservado_por 為空
        !self.reserved
    }
}

/// 出席狀態。資料庫端是 nullable boolean，未回覆時為 null。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Attendance {
    Yes,
    No,
    #[default]
    Unanswered,
}

impl From<Option<bool>> for Attendance {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Attendance::Yes,
            Some(false) => Attendance::No,
            None => Attendance::Unanswered,
        }
    }
}

impl From<Attendance> for Option<bool> {
    fn from(value: Attendance) -> Self {
        match value {
            Attendance::Yes => Some(true),
            Attendance::No => Some(false),
            Attendance::Unanswered => None,
        }
    }
}

/// 受邀賓客（rsvp 表），個人連結內嵌其 id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "vai", default)]
    pub attending: Attendance,
    #[serde(rename = "acompanhantes", default)]
    pub companions: Vec<Companion>,
}

impl Guest {
    pub fn companion_ids(&self) -> BTreeSet<CompanionId> {
        self.companions.iter().map(|c| c.id.clone()).collect()
    }
}

/// 賓客的同行者（acompanhantes 表），隨賓客預先建立
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub id: CompanionId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "vai", default)]
    pub attending: bool,
    #[serde(rename = "rsvp_id", default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<GuestId>,
}

/// 管理報表的一列：禮物與認領者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedGift {
    pub gift_id: GiftId,
    pub gift_name: String,
    /// None 表示 reservado_por 指向的賓客已不存在
    pub claimant_name: Option<String>,
}

/// 預訂結果。lost 非空代表部分失敗（有人先搶走了），不是硬錯誤。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationOutcome {
    /// 本次轉移成功的禮物，包含先前已由同一人認領的（冪等）
    pub claimed: BTreeSet<GiftId>,
    /// 已被其他人認領的禮物
    pub lost: BTreeSet<GiftId>,
}

impl ReservationOutcome {
    pub fn is_complete(&self) -> bool {
        self.lost.is_empty()
    }

    pub fn nothing_claimed(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// 禮物清單排序。純顯示用途，與正確性無關，但必須是確定性的。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftOrder {
    #[default]
    CreatedAt,
    Name,
}

impl GiftOrder {
    pub fn as_order_param(&self) -> &'static str {
        match self {
            GiftOrder::CreatedAt => "created_at.asc",
            GiftOrder::Name => "nome.asc",
        }
    }
}

impl FromStr for GiftOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "created_at" | "created" => Ok(GiftOrder::CreatedAt),
            "name" | "nome" => Ok(GiftOrder::Name),
            other => Err(format!(
                "Unknown order '{}'. Valid values: created_at, name",
                other
            )),
        }
    }
}

impl fmt::Display for GiftOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiftOrder::CreatedAt => f.write_str("created_at"),
            GiftOrder::Name => f.write_str("name"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_maps_nullable_boolean() {
        let guest: Guest = serde_json::from_value(serde_json::json!({
            "id": "g-1",
            "nome": "Ana",
            "vai": null
        }))
        .unwrap();
        assert_eq!(guest.attending, Attendance::Unanswered);

        let guest: Guest = serde_json::from_value(serde_json::json!({
            "id": "g-1",
            "nome": "Ana",
            "vai": true
        }))
        .unwrap();
        assert_eq!(guest.attending, Attendance::Yes);

        let json = serde_json::to_value(Attendance::No).unwrap();
        assert_eq!(json, serde_json::Value::Bool(false));
        let json = serde_json::to_value(Attendance::Unanswered).unwrap();
        assert_eq!(json, serde_json::Value::Null);
    }

    #[test]
    fn test_gift_deserializes_store_row() {
        let gift: Gift = serde_json::from_value(serde_json::json!({
            "id": "11111111-1111-1111-1111-111111111111",
            "nome": "Air Fryer",
            "reservado": false,
            "reservado_por": null,
            "created_at": "2026-01-10T09:00:00Z"
        }))
        .unwrap();

        assert!(gift.is_available());
        assert_eq!(gift.name, "Air Fryer");
        assert!(gift.reserved_by.is_none());
        assert!(gift.created_at.is_some());
    }

    #[test]
    fn test_guest_with_embedded_companions() {
        let guest: Guest = serde_json::from_value(serde_json::json!({
            "id": "g-1",
            "nome": "Ana",
            "vai": true,
            "acompanhantes": [
                {"id": "c-1", "nome": "Bia", "vai": false},
                {"id": "c-2", "nome": "Caio", "vai": true}
            ]
        }))
        .unwrap();

        assert_eq!(guest.companions.len(), 2);
        let ids = guest.companion_ids();
        assert!(ids.contains(&CompanionId::from("c-1")));
        assert!(ids.contains(&CompanionId::from("c-2")));
    }

    #[test]
    fn test_gift_order_from_str() {
        assert_eq!("created_at".parse::<GiftOrder>().unwrap(), GiftOrder::CreatedAt);
        assert_eq!("name".parse::<GiftOrder>().unwrap(), GiftOrder::Name);
        assert!("random".parse::<GiftOrder>().is_err());
        assert_eq!(GiftOrder::Name.as_order_param(), "nome.asc");
    }
}
