//! Staff appointments, availability and performed procedures

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::procedures::Procedure;
use super::response::{expect_status, json_or_error};
use super::{encode_segment, with_query, BackendClient, RequestOptions};
use crate::auth::session::{CookieStore, SessionStore};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub staff_id: String,
    #[serde(default)]
    pub procedure_ids: Vec<String>,
    pub appointment_date: String,
    pub is_completed: bool,
    pub is_canceled: bool,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub client: Option<ClientInfo>,
}

/// Weekly working pattern for one salon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingSchedule {
    pub available_week_days: Vec<String>,
    pub available_hours: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Availability {
    available: bool,
}

/// A period the staff member cannot take appointments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonAvailableRange {
    pub start: String,
    pub end: String,
    pub reason: String,
}

/// A procedure as performed by the signed-in staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProcedure {
    pub user_id: String,
    pub procedure_id: String,
    pub procedure_name: String,
    #[serde(default)]
    pub procedure_description: Option<String>,
    /// Minutes
    pub duration: u32,
    pub price: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProcedureTerms {
    pub duration_minutes: u32,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformedProcedure {
    pub staff_id: String,
    pub procedure_id: String,
    pub duration_minutes: u32,
    pub price: String,
}

/// Staff member of a salon with the procedures they perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonStaffProcedures {
    pub staff_id: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

/// A salon the signed-in staff member works at, with their settings there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSalon {
    pub salon_id: String,
    pub user_id: String,
    // The backend spells it this way
    #[serde(rename = "avalaibleForAppointments", default)]
    pub available_for_appointments: bool,
    #[serde(default)]
    pub available_week_days: Vec<String>,
    #[serde(default)]
    pub available_hours: Vec<String>,
    #[serde(default)]
    pub non_available_range: Vec<String>,
    pub salon_name: String,
    pub salon_location: String,
}

fn my_procedure_path(procedure_id: &str) -> String {
    format!("/users/staff/procedure/{}", encode_segment(procedure_id))
}

impl BackendClient {
    /// Appointments of the signed-in staff member, optionally for one day (`YYYY-MM-DD`)
    pub async fn staff_appointments<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        date: Option<&str>,
    ) -> Result<Vec<Appointment>> {
        let path = with_query("/users/staff/appointments", &[("date", date)]);
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn set_working_schedule<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        salon_id: &str,
        schedule: &WorkingSchedule,
    ) -> Result<()> {
        let path = format!("/users/{}/schedule", encode_segment(salon_id));
        let options = RequestOptions::post().json(schedule)?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    /// Toggle whether the staff member takes appointments at a salon
    pub async fn set_availability<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        salon_id: &str,
        available: bool,
    ) -> Result<()> {
        let path = format!("/users/{}/availability", encode_segment(salon_id));
        let options = RequestOptions::post().json(&Availability { available })?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    pub async fn set_non_available_range<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        salon_id: &str,
        range: &NonAvailableRange,
    ) -> Result<()> {
        let path = format!("/users/{}/non-available", encode_segment(salon_id));
        let options = RequestOptions::post().json(range)?;
        let res = self.fetch_with_auth(session, &path, options).await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    pub async fn my_salons<S: CookieStore>(&self, session: &SessionStore<S>) -> Result<Vec<StaffSalon>> {
        let res = self
            .fetch_with_auth(session, "/users/staff/salons", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn my_procedures<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
    ) -> Result<Vec<StaffProcedure>> {
        let res = self
            .fetch_with_auth(session, "/users/staff/my-procedures", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn update_my_procedure<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        procedure_id: &str,
        terms: &StaffProcedureTerms,
    ) -> Result<()> {
        let options = RequestOptions::method(Method::PUT).json(terms)?;
        let res = self
            .fetch_with_auth(session, &my_procedure_path(procedure_id), options)
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    pub async fn delete_my_procedure<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        procedure_id: &str,
    ) -> Result<()> {
        let res = self
            .fetch_with_auth(
                session,
                &my_procedure_path(procedure_id),
                RequestOptions::method(Method::DELETE),
            )
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await
    }

    /// Procedure catalogue as visible to staff
    pub async fn staff_catalogue<S: CookieStore>(&self, session: &SessionStore<S>) -> Result<Vec<Procedure>> {
        let res = self
            .fetch_with_auth(session, "/users/procedures", RequestOptions::get())
            .await?;
        json_or_error(res).await
    }

    pub async fn record_performed_procedure<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        record: &PerformedProcedure,
    ) -> Result<()> {
        let options = RequestOptions::post().json(record)?;
        let res = self
            .fetch_with_auth(session, "/users/staff/procedure", options)
            .await?;
        expect_status(res, StatusCode::CREATED).await
    }

    pub async fn salon_staff_procedures<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        salon_id: &str,
    ) -> Result<Vec<SalonStaffProcedures>> {
        let path = format!("/users/salon/{}/staff-procedures", encode_segment(salon_id));
        let res = self
            .fetch_with_auth(session, &path, RequestOptions::get())
            .await?;
        json_or_error(res).await
    }
}
