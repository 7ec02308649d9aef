//! Record store client for a PostgREST-style row API
//!
//! Rows are addressed by surrogate id with `?<Column>=eq.<id>` filters. Every
//! write asks for `Prefer: return=representation` so the stored row comes back.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use shared::{EmployeePatch, EmployeeRecord, EmployeeRole, NewEmployee, NewShift, Shift, ShiftStatus};

use crate::config::{SchedulerConfig, endpoint};
use crate::error::{SchedulerError, SchedulerResult};
use crate::services::{build_http_client, describe_failure};
use crate::traits::RecordStore;

const EMPLOYEE_TABLE: &str = "Employee";
const EMPLOYEE_KEY: &str = "EmployeeId";
const SHIFT_TABLE: &str = "Shift";
const SHIFT_KEY: &str = "ShiftID";
const ROLE_TABLE: &str = "EmployeeRole";

#[derive(Serialize)]
struct StatusUpdate {
    #[serde(rename = "ShiftStatus")]
    status: ShiftStatus,
}

#[derive(Clone)]
pub struct RealRecordStore {
    base_url: Url,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RealRecordStore {
    pub fn new(config: &SchedulerConfig) -> SchedulerResult<Self> {
        Ok(Self {
            base_url: config.store_base_url.clone(),
            api_key: config.store_api_key.clone(),
            client: build_http_client(config.request_timeout)?,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, endpoint(&self.base_url, table))
            .header("Prefer", "return=representation");
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }
        builder
    }

    fn keyed(&self, method: Method, table: &str, key: &str, id: &str) -> RequestBuilder {
        self.request(method, table).query(&[(key, format!("eq.{id}"))])
    }

    async fn rows<T: DeserializeOwned>(builder: RequestBuilder) -> SchedulerResult<Vec<T>> {
        let response = builder.send().await.map_err(|e| SchedulerError::store(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| SchedulerError::store(e.to_string()))?;

        if !status.is_success() {
            return Err(SchedulerError::store(describe_failure(status, &body)));
        }
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn single<T: DeserializeOwned>(builder: RequestBuilder, table: &str, id: &str) -> SchedulerResult<T> {
        Self::rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SchedulerError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })
    }

    async fn created<T: DeserializeOwned>(builder: RequestBuilder, table: &str) -> SchedulerResult<T> {
        Self::rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SchedulerError::store(format!("{table} insert returned no row")))
    }

    async fn delete(&self, table: &str, key: &str, id: &str) -> SchedulerResult<()> {
        let deleted: Vec<serde_json::Value> = Self::rows(self.keyed(Method::DELETE, table, key, id)).await?;
        if deleted.is_empty() {
            return Err(SchedulerError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        info!("🗑️ Deleted {} {}", table, id);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for RealRecordStore {
    async fn list_employees(&self) -> SchedulerResult<Vec<EmployeeRecord>> {
        let employees: Vec<EmployeeRecord> = Self::rows(self.request(Method::GET, EMPLOYEE_TABLE)).await?;
        debug!("Fetched {} employee rows", employees.len());
        Ok(employees)
    }

    async fn get_employee(&self, id: &str) -> SchedulerResult<EmployeeRecord> {
        Self::single(self.keyed(Method::GET, EMPLOYEE_TABLE, EMPLOYEE_KEY, id), EMPLOYEE_TABLE, id).await
    }

    async fn create_employee(&self, employee: &NewEmployee) -> SchedulerResult<EmployeeRecord> {
        let record: EmployeeRecord =
            Self::created(self.request(Method::POST, EMPLOYEE_TABLE).json(employee), EMPLOYEE_TABLE).await?;
        info!("👤 Created employee {} ({})", record.name, record.employee_id);
        Ok(record)
    }

    async fn update_employee(&self, id: &str, patch: &EmployeePatch) -> SchedulerResult<EmployeeRecord> {
        Self::single(
            self.keyed(Method::PATCH, EMPLOYEE_TABLE, EMPLOYEE_KEY, id).json(patch),
            EMPLOYEE_TABLE,
            id,
        )
        .await
    }

    async fn delete_employee(&self, id: &str) -> SchedulerResult<()> {
        self.delete(EMPLOYEE_TABLE, EMPLOYEE_KEY, id).await
    }

    async fn list_roles(&self) -> SchedulerResult<Vec<EmployeeRole>> {
        Self::rows(self.request(Method::GET, ROLE_TABLE)).await
    }

    async fn list_shifts(&self) -> SchedulerResult<Vec<Shift>> {
        let shifts: Vec<Shift> = Self::rows(self.request(Method::GET, SHIFT_TABLE)).await?;
        debug!("Fetched {} shift rows", shifts.len());
        Ok(shifts)
    }

    async fn get_shift(&self, id: &str) -> SchedulerResult<Shift> {
        Self::single(self.keyed(Method::GET, SHIFT_TABLE, SHIFT_KEY, id), SHIFT_TABLE, id).await
    }

    async fn create_shift(&self, shift: &NewShift) -> SchedulerResult<Shift> {
        let created: Shift = Self::created(self.request(Method::POST, SHIFT_TABLE).json(shift), SHIFT_TABLE).await?;
        info!("📅 Created shift {} ({})", created.id, created.shift_type());
        Ok(created)
    }

    async fn update_shift_status(&self, id: &str, status: ShiftStatus) -> SchedulerResult<Shift> {
        Self::single(
            self.keyed(Method::PATCH, SHIFT_TABLE, SHIFT_KEY, id)
                .json(&StatusUpdate { status }),
            SHIFT_TABLE,
            id,
        )
        .await
    }

    async fn delete_shift(&self, id: &str) -> SchedulerResult<()> {
        self.delete(SHIFT_TABLE, SHIFT_KEY, id).await
    }
}
