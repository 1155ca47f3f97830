//! User management, salon assignment and appointment actions

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::{expect_status, expect_success, json_or_error, json_with_status};
use super::{encode_segment, BackendClient, RequestOptions};
use crate::auth::session::{CookieStore, SessionStore};
use crate::error::Result;

/// A user account; the stored refresh token the backend includes is dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub phone_verified: bool,
    #[serde(default, rename = "TOSAccepted")]
    pub tos_accepted: bool,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Per-salon staff settings applied on assignment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_for_appointments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_week_days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_hours: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_available_range: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffUser {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub phone_number: String,
}

/// Create a user and attach them to a salon in one call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAndAssign {
    pub user_data: NewStaffUser,
    pub salon_id: String,
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_options: Option<StaffOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignToSalon {
    pub user_id: String,
    pub salon_id: String,
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_options: Option<StaffOptions>,
}

/// Role grant, optionally scoped to an organisation or salon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRole {
    pub user_id: String,
    pub role_id: String,
    pub organisation_id: Option<String>,
    pub salon_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// Member of an organisation with their salon and roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationUser {
    pub user: UserSummary,
    #[serde(default)]
    pub salon: Option<NamedRef>,
    #[serde(default)]
    pub roles: Vec<NamedRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub staff_id: String,
    pub procedure_ids: Vec<String>,
    pub appointment_date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestCancel<'a> {
    user_id: &'a str,
    reason: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteAppointment<'a> {
    staff_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct CancelAppointment<'a> {
    reason: &'a str,
}

fn appointment_path(appointment_id: &str, action: &str) -> String {
    format!("/users/appointment/{}/{}", encode_segment(appointment_id), action)
}

impl BackendClient {
    pub async fn list_users<S: CookieStore>(&self, session: &SessionStore<S>) -> Result<Vec<User>> {
        let res = self
            .fetch_with_auth(session, "/users", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn get_user<S: CookieStore>(&self, session: &SessionStore<S>, id: &str) -> Result<User> {
        let path = format!("/users/{}", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn create_user<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &CreateUser,
    ) -> Result<User> {
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, "/users", options).await?;
        json_with_status(res, StatusCode::CREATED).await
    }

    pub async fn update_user<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        id: &str,
        payload: &UpdateUser,
    ) -> Result<User> {
        let path = format!("/users/{}", encode_segment(id));
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        json_or_error(res).await
    }

    pub async fn delete_user<S: CookieStore>(&self, session: &SessionStore<S>, id: &str) -> Result<()> {
        let path = format!("/users/{}/delete", encode_segment(id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::post())
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    pub async fn create_and_assign_user<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &CreateAndAssign,
    ) -> Result<User> {
        let options = RequestOptions::post().json(payload)?;
        let res = self
            .fetch_with_auth(session, "/users/create-assign", options)
            .await?;
        json_with_status(res, StatusCode::CREATED).await
    }

    pub async fn assign_user_to_salon<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &AssignToSalon,
    ) -> Result<()> {
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, "/users/assign", options).await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    pub async fn assign_role<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &AssignRole,
    ) -> Result<()> {
        let options = RequestOptions::post().json(payload)?;
        let res = self
            .fetch_with_auth(session, "/users/assign-role", options)
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    pub async fn users_by_organisation<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        organisation_id: &str,
    ) -> Result<Vec<OrganisationUser>> {
        let path = format!("/users/organisation/{}", encode_segment(organisation_id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn book_appointment<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        payload: &BookAppointment,
    ) -> Result<()> {
        let options = RequestOptions::post().json(payload)?;
        let res = self.fetch_with_auth(session, "/users/book", options).await?;
        expect_status(res, StatusCode::CREATED).await
    }

    /// Client-side cancellation request; staff decide on it later
    pub async fn request_appointment_cancellation<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        appointment_id: &str,
        user_id: &str,
        reason: &str,
    ) -> Result<()> {
        let options = RequestOptions::post().json(&RequestCancel { user_id, reason })?;
        let path = appointment_path(appointment_id, "request-cancel");
        let res = self.fetch_with_auth(session, &path, options).await?;
        expect_success(res).await
    }

    pub async fn complete_appointment<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        appointment_id: &str,
        staff_id: &str,
    ) -> Result<()> {
        let options = RequestOptions::post().json(&CompleteAppointment { staff_id })?;
        let path = appointment_path(appointment_id, "complete");
        let res = self.fetch_with_auth(session, &path, options).await?;
        expect_success(res).await
    }

    pub async fn cancel_appointment<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        appointment_id: &str,
        reason: &str,
    ) -> Result<()> {
        let options = RequestOptions::post().json(&CancelAppointment { reason })?;
        let path = appointment_path(appointment_id, "cancel");
        let res = self.fetch_with_auth(session, &path, options).await?;
        expect_success(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_path() {
        assert_eq!(
            appointment_path("ap 1", "request-cancel"),
            "/users/appointment/ap%201/request-cancel"
        );
    }

    #[test]
    fn test_assign_role_sends_null_scopes() {
        let body = serde_json::to_value(AssignRole {
            user_id: "u1".to_string(),
            role_id: "r1".to_string(),
            organisation_id: Some("o1".to_string()),
            salon_id: None,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "userId": "u1",
                "roleId": "r1",
                "organisationId": "o1",
                "salonId": null
            })
        );
    }

    #[test]
    fn test_user_ignores_stored_refresh_token() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "firstname": "Ana",
            "lastname": "Berg",
            "username": "ana",
            "email": "ana@example.com",
            "phoneNumber": null,
            "emailVerified": true,
            "phoneVerified": false,
            "refreshToken": "secret",
            "TOSAccepted": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": null
        }))
        .unwrap();
        assert!(user.tos_accepted);
        assert!(!serde_json::to_string(&user).unwrap().contains("secret"));
    }
}
