//! Salon procedure catalogue

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::{expect_status, json_or_error, json_with_status};
use super::{encode_segment, BackendClient, RequestOptions};
use crate::auth::session::{CookieStore, SessionStore};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Decimal string as sent by the backend
    #[serde(default)]
    pub price: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcedure {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcedure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BackendClient {
    pub async fn list_procedures<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
    ) -> Result<Vec<Procedure>> {
        let res = self
            .fetch_with_auth(session, "/procedures", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn get_procedure<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
    ) -> Result<Procedure> {
        let path = format!("/procedures/{}", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn create_procedure<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &CreateProcedure,
    ) -> Result<Procedure> {
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, "/procedures", options).await?;
        json_with_status(res, StatusCode::CREATED).await
    }

    pub async fn update_procedure<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
        payload: &UpdateProcedure,
    ) -> Result<Procedure> {
        let path = format!("/procedures/{}", encode_segment(id));
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        json_or_error(res).await
    }

    pub async fn delete_procedure<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
    ) -> Result<()> {
        let path = format!("/procedures/{}/delete", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::post())
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }
}
