use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::{expect_status, json_or_error, json_with_status};
use super::{encode_segment, BackendClient, RequestOptions};
use crate::auth::session::{CookieStore, SessionStore};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermission {
    pub action: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePermission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The backend wants the id repeated in the update body
#[derive(Serialize)]
struct UpdatePermissionBody<'a> {
    id: &'a str,
    #[serde(flatten)]
    changes: &'a UpdatePermission,
}

impl BackendClient {
    pub async fn list_permissions<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
    ) -> Result<Vec<Permission>> {
        let res = self
            .fetch_with_auth(session, "/permissions", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn get_permission<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
    ) -> Result<Permission> {
        let path = format!("/permissions/{}", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn create_permission<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &CreatePermission,
    ) -> Result<Permission> {
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, "/permissions", options).await?;
        json_with_status(res, StatusCode::CREATED).await
    }

    pub async fn update_permission<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
        changes: &UpdatePermission,
    ) -> Result<Permission> {
        let path = format!("/permissions/{}", encode_segment(id));
        let options = RequestOptions::post().json(&UpdatePermissionBody { id, changes })?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        json_or_error(res).await
    }

    pub async fn delete_permission<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
    ) -> Result<()> {
        let path = format!("/permissions/{}/delete", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::post())
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }
}
