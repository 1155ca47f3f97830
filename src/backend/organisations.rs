//! Organisation endpoints, including the earnings report

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::{expect_status, json_or_error};
use super::{encode_segment, with_query, BackendClient, RequestOptions};
use crate::auth::session::{CookieStore, SessionStore};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganisation {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganisation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Revenue of one salon over the requested period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsItem {
    pub salon_id: String,
    pub salon_name: String,
    /// Decimal amount as sent by the backend
    pub total: String,
}

/// Filters for the earnings report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsQuery {
    /// `YYYY-MM`
    pub month: Option<String>,
    /// `YYYY`
    pub year: Option<String>,
    #[serde(default)]
    pub salon_ids: Vec<String>,
}

impl EarningsQuery {
    fn to_path(&self, organisation_id: &str) -> String {
        let salon_ids = (!self.salon_ids.is_empty()).then(|| self.salon_ids.join(","));
        with_query(
            &format!("/organisations/{}/earnings", encode_segment(organisation_id)),
            &[
                ("month", self.month.as_deref()),
                ("year", self.year.as_deref()),
                ("salonIds", salon_ids.as_deref()),
            ],
        )
    }
}

impl BackendClient {
    pub async fn list_organisations<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
    ) -> Result<Vec<Organisation>> {
        let res = self
            .fetch_with_auth(session, "/organisations", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    /// Organisations owned by the signed-in user
    pub async fn my_organisations<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
    ) -> Result<Vec<Organisation>> {
        let res = self
            .fetch_with_auth(session, "/organisations/me", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn get_organisation<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
    ) -> Result<Organisation> {
        let path = format!("/organisations/{}", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn create_organisation<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &CreateOrganisation,
    ) -> Result<Organisation> {
        let options = RequestOptions::post().json(payload)?;
        let res = self
            .fetch_with_auth(session, "/organisations", options)
            .await?;
        json_or_error(res).await
    }

    pub async fn update_organisation<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
        payload: &UpdateOrganisation,
    ) -> Result<Organisation> {
        let path = format!("/organisations/{}", encode_segment(id));
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        json_or_error(res).await
    }

    pub async fn delete_organisation<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
    ) -> Result<()> {
        let path = format!("/organisations/{}/delete", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::post())
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    /// Per-salon revenue for an organisation
    pub async fn organisation_earnings<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
        query: &EarningsQuery,
    ) -> Result<Vec<EarningsItem>> {
        let res = self
            .fetch_with_auth(session, &query.to_path(id), RequestOptions::get())
            .await?;
        json_or_error(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earnings_path() {
        let query = EarningsQuery {
            month: Some("2024-03".to_string()),
            year: None,
            salon_ids: vec!["s1".to_string(), "s2".to_string()],
        };
        assert_eq!(
            query.to_path("org 1"),
            "/organisations/org%201/earnings?month=2024-03&salonIds=s1%2Cs2"
        );
        assert_eq!(
            EarningsQuery::default().to_path("o"),
            "/organisations/o/earnings"
        );
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let payload = UpdateOrganisation {
            name: Some("Renamed".to_string()),
            created_at: None,
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"name":"Renamed"}"#
        );
    }
}
