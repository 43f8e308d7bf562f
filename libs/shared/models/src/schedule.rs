//! Typed date → time → record maps shared by doctor schedules and patient appointments.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub type DaySchedule<T> = BTreeMap<SlotTime, T>;
pub type Schedule<T> = BTreeMap<NaiveDate, DaySchedule<T>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Booked slot at {0} must reference a patient")]
    MissingPatient(SlotTime),

    #[error("Slot at {time} with status '{status}' cannot reference a patient")]
    UnexpectedPatient { time: SlotTime, status: String },
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ScheduleError::InvalidDate(value.to_string()))
}

/// Minute-resolution time of day used as a slot key, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for SlotTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // chrono accepts single-digit hours; keys must stay canonical
        if trimmed.len() != 5 {
            return Err(ScheduleError::InvalidTime(s.to_string()));
        }
        NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
            .map(Self)
            .map_err(|_| ScheduleError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Disponivel,
    Reservado,
    Bloqueado,
    Cancelado,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Disponivel => "disponivel",
            SlotStatus::Reservado => "reservado",
            SlotStatus::Bloqueado => "bloqueado",
            SlotStatus::Cancelado => "cancelado",
        }
    }
}

/// A time slot in a doctor's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slot {
    pub status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paciente_id: Option<String>,
}

impl Slot {
    pub fn available() -> Self {
        Self { status: SlotStatus::Disponivel, paciente_id: None }
    }

    pub fn booked(patient_id: impl Into<String>) -> Self {
        Self { status: SlotStatus::Reservado, paciente_id: Some(patient_id.into()) }
    }

    pub fn validate(&self, time: SlotTime) -> Result<(), ScheduleError> {
        match (&self.status, &self.paciente_id) {
            (SlotStatus::Reservado, None) => Err(ScheduleError::MissingPatient(time)),
            (SlotStatus::Reservado, Some(id)) if id.trim().is_empty() => {
                Err(ScheduleError::MissingPatient(time))
            }
            (SlotStatus::Reservado, Some(_)) => Ok(()),
            (status, Some(_)) => Err(ScheduleError::UnexpectedPatient {
                time,
                status: status.as_str().to_string(),
            }),
            (_, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Agendada,
    Confirmada,
    Realizada,
    Cancelada,
}

/// A scheduled visit in a patient's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appointment {
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medico_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especialidade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

/// For `#[serde(deserialize_with)]`: a stored `null` schedule reads as empty.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Schedule<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Schedule<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn validate_doctor_schedule(schedule: &Schedule<Slot>) -> Result<(), ScheduleError> {
    for day in schedule.values() {
        for (time, slot) in day {
            slot.validate(*time)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "null_as_empty")]
        horarios: Schedule<Slot>,
    }

    #[test]
    fn null_or_missing_schedule_is_empty() {
        let from_null: Holder = serde_json::from_value(json!({"horarios": null})).unwrap();
        assert!(from_null.horarios.is_empty());

        let missing: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(missing.horarios.is_empty());

        let filled: Holder =
            serde_json::from_value(json!({"horarios": {"2024-12-25": {"09:00": {"status": "disponivel"}}}})).unwrap();
        assert_eq!(filled.horarios.len(), 1);
    }

    #[test]
    fn slot_time_round_trips_as_hh_mm() {
        let time: SlotTime = "09:30".parse().unwrap();
        assert_eq!(time.to_string(), "09:30");
        assert_eq!(serde_json::to_value(time).unwrap(), json!("09:30"));
    }

    #[test]
    fn slot_time_rejects_other_formats() {
        assert!("9:30".parse::<SlotTime>().is_err());
        assert!("09:30:00".parse::<SlotTime>().is_err());
        assert!("25:00".parse::<SlotTime>().is_err());
        assert!("manha".parse::<SlotTime>().is_err());
    }

    #[test]
    fn schedule_deserializes_from_nested_map() {
        let raw = json!({
            "2024-12-25": {
                "14:30": { "status": "reservado", "paciente_id": "p1" },
                "09:00": { "status": "disponivel" }
            }
        });
        let schedule: Schedule<Slot> = serde_json::from_value(raw).unwrap();
        let day = &schedule[&parse_date("2024-12-25").unwrap()];
        let keys: Vec<String> = day.keys().map(|t| t.to_string()).collect();
        assert_eq!(keys, vec!["09:00", "14:30"]);
        assert!(validate_doctor_schedule(&schedule).is_ok());
    }

    #[test]
    fn rejects_unknown_status_and_bad_keys() {
        let bad_status = json!({ "2024-12-25": { "10:00": { "status": "talvez" } } });
        assert!(serde_json::from_value::<Schedule<Slot>>(bad_status).is_err());

        let bad_date = json!({ "25/12/2024": { "10:00": { "status": "disponivel" } } });
        assert!(serde_json::from_value::<Schedule<Slot>>(bad_date).is_err());
    }

    #[test]
    fn booked_slot_requires_patient() {
        let time = SlotTime::from_hm(10, 0).unwrap();
        let slot = Slot { status: SlotStatus::Reservado, paciente_id: None };
        assert_eq!(slot.validate(time), Err(ScheduleError::MissingPatient(time)));

        let slot = Slot { status: SlotStatus::Bloqueado, paciente_id: Some("p1".into()) };
        assert!(slot.validate(time).is_err());

        assert!(Slot::booked("p1").validate(time).is_ok());
        assert!(Slot::available().validate(time).is_ok());
    }

    #[test]
    fn appointment_requires_status() {
        let ok = json!({ "status": "agendada", "medico_id": "m1" });
        assert!(serde_json::from_value::<Appointment>(ok).is_ok());

        let missing = json!({ "medico_id": "m1" });
        assert!(serde_json::from_value::<Appointment>(missing).is_err());
    }
}
