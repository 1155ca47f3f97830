//! Salon endpoints

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::{expect_status, json_or_error, json_with_status};
use super::{encode_segment, BackendClient, RequestOptions};
use crate::auth::session::{CookieStore, SessionStore};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salon {
    pub id: String,
    pub name: String,
    pub location: String,
    pub organisation_id: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalon {
    pub organisation_id: String,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSalon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl BackendClient {
    pub async fn list_salons<S: CookieStore>(&self, session: &SessionStore<S>) -> Result<Vec<Salon>> {
        let res = self
            .fetch_with_auth(session, "/salons", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn salons_by_organisation<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        organisation_id: &str,
    ) -> Result<Vec<Salon>> {
        let path = format!("/salons/organisation/{}", encode_segment(organisation_id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn get_salon<S: CookieStore>(&self, session: &SessionStore<S>, id: &str) -> Result<Salon> {
        let path = format!("/salons/{}", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn create_salon<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &CreateSalon,
    ) -> Result<Salon> {
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, "/salons", options).await?;
        json_with_status(res, StatusCode::CREATED).await
    }

    pub async fn update_salon<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
        payload: &UpdateSalon,
    ) -> Result<Salon> {
        let path = format!("/salons/{}", encode_segment(id));
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        json_or_error(res).await
    }

    pub async fn delete_salon<S: CookieStore>(&self, session: &SessionStore<S>, id: &str) -> Result<()> {
        let path = format!("/salons/{}/delete", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::post())
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }
}
