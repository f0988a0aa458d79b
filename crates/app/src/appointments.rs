//! Appointment and Status screens
//!
//! Appointments are not served by the remote API yet; both screens render
//! the same sample book and personalise the header from the stored session.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::identity::{load_identity, IdentityView};
use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Pending and confirmed visits are still ahead of the patient
    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub id: u32,
    pub doctor: String,
    pub specialty: String,
    pub status: AppointmentStatus,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Appointment {
    /// e.g. "March 30, 2025 at 10:00 AM"
    pub fn when(&self) -> String {
        format!(
            "{} at {}",
            self.date.format("%B %-d, %Y"),
            self.time.format("%-I:%M %p")
        )
    }
}

// (id, doctor, specialty, status, y, m, d, hour, minute)
type SampleRow = (u32, &'static str, &'static str, AppointmentStatus, i32, u32, u32, u32, u32);

const SAMPLE_APPOINTMENTS: &[SampleRow] = &[
    (1, "Dr. John Doe", "Cardiologist", AppointmentStatus::Confirmed, 2025, 3, 30, 10, 0),
    (2, "Dr. Jane Smith", "Neurologist", AppointmentStatus::Pending, 2025, 4, 2, 14, 0),
    (3, "Dr. Emily White", "Dermatologist", AppointmentStatus::Cancelled, 2025, 4, 5, 16, 30),
];

/// Ordered collection of a patient's appointments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn new(mut appointments: Vec<Appointment>) -> Self {
        appointments.sort_by_key(|appointment| (appointment.date, appointment.time));
        Self { appointments }
    }

    /// The book shown until appointments are served remotely
    pub fn sample() -> Self {
        let appointments = SAMPLE_APPOINTMENTS
            .iter()
            .filter_map(|&(id, doctor, specialty, status, y, m, d, hour, minute)| {
                Some(Appointment {
                    id,
                    doctor: doctor.to_string(),
                    specialty: specialty.to_string(),
                    status,
                    date: NaiveDate::from_ymd_opt(y, m, d)?,
                    time: NaiveTime::from_hms_opt(hour, minute, 0)?,
                })
            })
            .collect();
        Self::new(appointments)
    }

    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn upcoming(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| appointment.status.is_upcoming())
    }

    pub fn with_status(&self, status: AppointmentStatus) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .iter()
            .filter(move |appointment| appointment.status == status)
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

/// Appointment screen: upcoming visits only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentView {
    pub identity: IdentityView,
    pub upcoming: Vec<Appointment>,
}

impl AppointmentView {
    pub fn heading(&self) -> String {
        format!("Appointments for {}", self.identity.name)
    }
}

/// Status screen: every appointment with its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub identity: IdentityView,
    pub appointments: Vec<Appointment>,
}

impl StatusView {
    pub fn greeting(&self) -> String {
        format!("Hello, {}!", self.identity.name)
    }
}

pub async fn load_appointments(app: &App, book: &AppointmentBook) -> AppointmentView {
    AppointmentView {
        identity: load_identity(app).await,
        upcoming: book.upcoming().cloned().collect(),
    }
}

pub async fn load_status(app: &App, book: &AppointmentBook) -> StatusView {
    StatusView {
        identity: load_identity(app).await,
        appointments: book.all().to_vec(),
    }
}
