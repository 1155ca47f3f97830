//! Role administration

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::{expect_status, json_or_error, json_with_status};
use super::{encode_segment, BackendClient, RequestOptions};
use crate::auth::session::{CookieStore, SessionStore};
use crate::error::Result;

/// A role record; `role` holds the tag carried in access token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: String,
    pub role: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BackendClient {
    pub async fn list_roles<S: CookieStore>(&self, session: &SessionStore<S>) -> Result<Vec<RoleRecord>> {
        let res = self
            .fetch_with_auth(session, "/roles", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn get_role<S: CookieStore>(&self, session: &SessionStore<S>, id: &str) -> Result<RoleRecord> {
        let path = format!("/roles/{}", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn create_role<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &CreateRole,
    ) -> Result<RoleRecord> {
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, "/roles", options).await?;
        json_with_status(res, StatusCode::CREATED).await
    }

    pub async fn update_role<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
        payload: &UpdateRole,
    ) -> Result<RoleRecord> {
        let path = format!("/roles/{}", encode_segment(id));
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        json_or_error(res).await
    }

    pub async fn delete_role<S: CookieStore>(&self, session: &SessionStore<S>, id: &str) -> Result<()> {
        let path = format!("/roles/{}/delete", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::post())
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }
}
