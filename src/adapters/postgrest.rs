use crate::adapters::filter::Filter;
use crate::domain::model::{
    Companion, CompanionId, Gift, GiftId, GiftOrder, Guest, GuestId, ReservedGift,
};
use crate::domain::ports::{ConfigProvider, GiftStore, GuestStore};
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

const GIFTS_TABLE: &str = "presentes";
const GUESTS_TABLE: &str = "rsvp";
const COMPANIONS_TABLE: &str = "acompanhantes";

const GIFT_COLUMNS: &str = "id,nome,reservado,reservado_por,created_at";
// PostgREST embedded resource，走 acompanhantes.rsvp_id 外鍵，別名成 acompanhantes
const GUEST_COLUMNS: &str = "id,nome,vai,acompanhantes:acompanhantes_rsvp_id_fkey(id,nome,vai)";
// 報表用：走 reservado_por 外鍵帶出認領者名稱
const RESERVED_COLUMNS: &str = "id,nome,convidado:rsvp!presentes_reservado_por_fkey(nome)";

/// 對 Supabase/PostgREST 風格資料服務的唯一客戶端。整個程式只建一份，
/// 需要共享時 clone 即可（reqwest::Client 內部是連線池）。
#[derive(Clone)]
pub struct PostgrestStore<C: ConfigProvider> {
    config: C,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ReservedRow {
    id: GiftId,
    nome: String,
    #[serde(default)]
    convidado: Option<NameRow>,
}

#[derive(Debug, Deserialize)]
struct NameRow {
    nome: String,
}

impl<C: ConfigProvider> PostgrestStore<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.store_url().trim_end_matches('/'),
            table
        )
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.table_url(table))
            .header("apikey", self.config.api_key())
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key()),
            );

        let timeout = self.config.timeout_seconds();
        if timeout > 0 {
            request = request.timeout(Duration::from_secs(timeout));
        }

        request
    }

    /// 傳輸層錯誤與 5xx 以固定間隔重試。所有寫入不是冪等就是帶過濾條件，
    /// 重送永遠安全。
    async fn send_with_retry(&self, request: RequestBuilder) -> Result<Response> {
        let attempts = self.config.retry_attempts();
        let delay = Duration::from_secs(self.config.retry_delay_seconds());

        for attempt in 0..=attempts {
            let Some(current) = request.try_clone() else {
                break;
            };
            let last = attempt == attempts;

            match current.send().await {
                Ok(response) if response.status().is_server_error() && !last => {
                    tracing::warn!(
                        "Store returned {} (attempt {}/{}), retrying",
                        response.status(),
                        attempt + 1,
                        attempts + 1
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => return Self::check_status(response).await,
                Err(e) if !last && (e.is_connect() || e.is_timeout()) => {
                    tracing::warn!(
                        "Store request failed (attempt {}/{}): {}",
                        attempt + 1,
                        attempts + 1,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // 請求本體無法 clone 時退回單次送出
        let response = request.send().await?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(SiteError::StoreRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filter: &Filter,
        order: Option<&str>,
    ) -> Result<Vec<T>> {
        let mut request = self
            .request(Method::GET, table)
            .query(&[("select", columns)]);
        if let Some(order) = order {
            request = request.query(&[("order", order)]);
        }
        if !filter.is_empty() {
            request = request.query(filter.pairs());
        }

        tracing::debug!("GET {} (filter: {:?})", table, filter.pairs());
        let response = self.send_with_retry(request).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    /// PATCH 帶 `Prefer: return=representation`：回應本體就是實際被更新的
    /// 列，這是「受影響識別碼集合」的來源。
    async fn update_returning<T: DeserializeOwned>(
        &self,
        table: &str,
        patch: serde_json::Value,
        filter: &Filter,
    ) -> Result<Vec<T>> {
        let request = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(filter.pairs())
            .json(&patch);

        tracing::debug!("PATCH {} (filter: {:?})", table, filter.pairs());
        let response = self.send_with_retry(request).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn update_minimal(
        &self,
        table: &str,
        patch: serde_json::Value,
        filter: &Filter,
    ) -> Result<()> {
        let request = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=minimal")
            .query(filter.pairs())
            .json(&patch);

        tracing::debug!("PATCH {} (filter: {:?})", table, filter.pairs());
        self.send_with_retry(request).await?;
        Ok(())
    }

    async fn insert_returning<T: DeserializeOwned>(
        &self,
        table: &str,
        record: serde_json::Value,
    ) -> Result<Vec<T>> {
        let request = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&record);

        tracing::debug!("POST {}", table);
        let response = self.send_with_retry(request).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    fn first_inserted<T>(table: &str, rows: Vec<T>) -> Result<T> {
        rows.into_iter()
            .next()
            .ok_or_else(|| SiteError::ProcessingError {
                message: format!("insert into {} returned no rows", table),
            })
    }
}

#[async_trait]
impl<C: ConfigProvider + Clone> GiftStore for PostgrestStore<C> {
    async fn available_gifts(&self, order: GiftOrder) -> Result<Vec<Gift>> {
        let filter = Filter::new().eq("reservado", false);
        self.select(
            GIFTS_TABLE,
            GIFT_COLUMNS,
            &filter,
            Some(order.as_order_param()),
        )
        .await
    }

    async fn gifts_by_ids(&self, ids: &BTreeSet<GiftId>) -> Result<Vec<Gift>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = Filter::new().in_set("id", ids);
        self.select(GIFTS_TABLE, GIFT_COLUMNS, &filter, None).await
    }

    async fn claim_unreserved(
        &self,
        ids: &BTreeSet<GiftId>,
        claimant: &GuestId,
    ) -> Result<BTreeSet<GiftId>> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        // filtered update：reservado = false 必須在謂詞裡，store 端逐列
        // 原子套用，這就是防止重複認領的全部機制
        let filter = Filter::new().in_set("id", ids).eq("reservado", false);
        let patch = serde_json::json!({
            "reservado": true,
            "reservado_por": claimant,
        });

        let rows: Vec<Gift> = self.update_returning(GIFTS_TABLE, patch, &filter).await?;
        Ok(rows.into_iter().map(|gift| gift.id).collect())
    }

    async fn reserved_gifts(&self) -> Result<Vec<ReservedGift>> {
        let filter = Filter::new().eq("reservado", true);
        let rows: Vec<ReservedRow> = self
            .select(
                GIFTS_TABLE,
                RESERVED_COLUMNS,
                &filter,
                Some("created_at.asc"),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ReservedGift {
                gift_id: row.id,
                gift_name: row.nome,
                claimant_name: row.convidado.map(|c| c.nome),
            })
            .collect())
    }

    async fn insert_gift(&self, name: &str) -> Result<GiftId> {
        let rows: Vec<Gift> = self
            .insert_returning(GIFTS_TABLE, serde_json::json!({ "nome": name }))
            .await?;
        Self::first_inserted(GIFTS_TABLE, rows).map(|gift| gift.id)
    }
}

#[async_trait]
impl<C: ConfigProvider + Clone> GuestStore for PostgrestStore<C> {
    async fn guest(&self, id: &GuestId) -> Result<Option<Guest>> {
        let filter = Filter::new().eq("id", id);
        let guests: Vec<Guest> = self
            .select(GUESTS_TABLE, GUEST_COLUMNS, &filter, None)
            .await?;
        Ok(guests.into_iter().next())
    }

    async fn set_attendance(&self, id: &GuestId, attending: bool) -> Result<()> {
        let filter = Filter::new().eq("id", id);
        self.update_minimal(
            GUESTS_TABLE,
            serde_json::json!({ "vai": attending }),
            &filter,
        )
        .await
    }

    async fn set_companion_attendance(
        &self,
        guest: &GuestId,
        ids: &BTreeSet<CompanionId>,
        attending: bool,
    ) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        // rsvp_id 條件限定只動這位賓客名下的同行者
        let filter = Filter::new().in_set("id", ids).eq("rsvp_id", guest);
        self.update_minimal(
            COMPANIONS_TABLE,
            serde_json::json!({ "vai": attending }),
            &filter,
        )
        .await
    }

    async fn insert_guest(&self, name: &str) -> Result<GuestId> {
        let rows: Vec<Guest> = self
            .insert_returning(GUESTS_TABLE, serde_json::json!({ "nome": name }))
            .await?;
        Self::first_inserted(GUESTS_TABLE, rows).map(|guest| guest.id)
    }

    async fn insert_companion(&self, guest: &GuestId, name: &str) -> Result<Companion> {
        let rows: Vec<Companion> = self
            .insert_returning(
                COMPANIONS_TABLE,
                serde_json::json!({ "nome": name, "rsvp_id": guest, "vai": false }),
            )
            .await?;
        Self::first_inserted(COMPANIONS_TABLE, rows)
    }
}
