use std::fmt;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use shared_models::{ClientError, NormalizationError};

/// Envelope the user backend wraps its results in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Reads the body of an accepted write. Any 2xx counts as done; the
    /// envelope is only consulted when there is a readable one.
    pub fn from_accepted(status: u16, body: &str) -> Result<Option<T>, ClientError> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<ApiResponse<T>>(body) {
            Ok(envelope) => envelope.into_optional_data(status),
            Err(e) => {
                warn!("Ignoring unreadable body of accepted request: {}", e);
                Ok(None)
            }
        }
    }
}

impl<T> ApiResponse<T> {
    /// A body with `success: false` is treated as a backend rejection even on 2xx.
    pub fn into_optional_data(self, status: u16) -> Result<Option<T>, ClientError> {
        if self.success == Some(false) {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Request failed".to_string());
            return Err(ClientError::from_backend(status, message));
        }

        Ok(self.data)
    }

    pub fn into_data(self, status: u16) -> Result<T, ClientError> {
        self.into_optional_data(status)?
            .ok_or_else(|| NormalizationError::MissingFields("data".to_string()).into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentType {
    Consultation,
    FollowUp,
    Emergency,
    Checkup,
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self {
            AppointmentType::Consultation => "CONSULTATION",
            AppointmentType::FollowUp => "FOLLOW_UP",
            AppointmentType::Emergency => "EMERGENCY",
            AppointmentType::Checkup => "CHECKUP",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub fn is_upcoming(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Unknown => "UNKNOWN",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub doctor_id: String,
    /// Local wall-clock time, sent as `YYYY-MM-DDTHH:MM:SS`.
    #[serde(with = "local_datetime")]
    pub appointment_date_time: NaiveDateTime,
    pub appointment_type: AppointmentType,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub doctor_id: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub doctor_specialization: Option<String>,
    pub appointment_date_time: NaiveDateTime,
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDoctor {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub hospital_affiliation: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<i32>,
}

impl AvailableDoctor {
    pub fn full_name(&self) -> String {
        format!(
            "Dr. {} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim_end()
        .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
}

mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
