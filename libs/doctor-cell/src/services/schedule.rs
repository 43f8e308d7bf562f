use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, DocumentId, DocumentStore, ScheduleRepository};
use shared_models::schedule::{parse_date, validate_doctor_schedule, Schedule, Slot, SlotTime};

use crate::models::{DoctorError, SlotDeleteRequest, SlotUpdateRequest, DOCTORS_COLLECTION, SCHEDULE_FIELD};

/// The `horarios` map of a doctor: date → time → slot.
pub struct DoctorScheduleService {
    store: Arc<dyn DocumentStore>,
}

impl DoctorScheduleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    fn repository(&self) -> ScheduleRepository<'_> {
        ScheduleRepository::new(&*self.store, DOCTORS_COLLECTION, SCHEDULE_FIELD)
    }

    pub async fn get_schedule(&self, doctor_id: &DocumentId) -> Result<Schedule<Slot>, DoctorError> {
        debug!("Fetching schedule of doctor {}", doctor_id);

        self.repository()
            .load(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    /// Adds or replaces whole days.
    pub async fn replace_days(&self, doctor_id: &DocumentId, days: Schedule<Slot>) -> Result<(), DoctorError> {
        if days.is_empty() {
            return Err(DoctorError::EmptySchedule);
        }
        validate_doctor_schedule(&days)?;
        debug!("Replacing {} day(s) of doctor {}", days.len(), doctor_id);

        if !self.repository().merge_days(doctor_id, &days).await? {
            return Err(DoctorError::NotFound);
        }
        info!("Schedule of doctor {} updated", doctor_id);
        Ok(())
    }

    /// Writes one slot; the other slots of that date are left as they were.
    pub async fn update_slot(&self, doctor_id: &DocumentId, request: SlotUpdateRequest) -> Result<(), DoctorError> {
        let (date, time, slot) = match (request.data, request.hora, request.info) {
            (Some(date), Some(time), Some(slot)) if !date.is_empty() && !time.is_empty() => (date, time, slot),
            _ => return Err(DoctorError::MissingSlotFields),
        };

        let date = parse_date(&date)?;
        let time: SlotTime = time.parse()?;
        slot.validate(time)?;
        debug!("Setting slot {} {} of doctor {} to {}", date, time, doctor_id, slot.status.as_str());

        if !self.repository().set_entry(doctor_id, date, time, &slot).await? {
            return Err(DoctorError::NotFound);
        }
        Ok(())
    }

    /// Without `hora` the whole date is removed.
    pub async fn delete_slot(&self, doctor_id: &DocumentId, request: SlotDeleteRequest) -> Result<(), DoctorError> {
        let date = match request.data {
            Some(date) if !date.is_empty() => parse_date(&date)?,
            _ => return Err(DoctorError::MissingDate),
        };
        let time = match request.hora {
            Some(time) if !time.is_empty() => Some(time.parse::<SlotTime>()?),
            _ => None,
        };
        debug!("Removing {} {:?} from doctor {}", date, time, doctor_id);

        if !self.repository().remove_entry(doctor_id, date, time).await? {
            return Err(DoctorError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use shared_database::InMemoryStore;
    use shared_models::schedule::{ScheduleError, SlotStatus};
    use shared_utils::test_utils::TestConfig;

    use crate::models::CreateDoctorRequest;
    use crate::services::DoctorService;

    async fn setup() -> (DoctorScheduleService, DocumentId) {
        let state = TestConfig::default().to_state_with_store(Arc::new(InMemoryStore::new()));
        let doctor: CreateDoctorRequest = serde_json::from_value(json!({
            "nome": "Dr. X", "cpf": "1", "crm": "2", "especialidade": "Y"
        }))
        .unwrap();
        let id = DoctorService::new(&state).create_doctor(doctor).await.unwrap();
        (DoctorScheduleService::new(&state), id)
    }

    fn days(value: serde_json::Value) -> Schedule<Slot> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn replace_days_validates_slots() {
        let (service, id) = setup().await;

        assert_matches!(service.replace_days(&id, Schedule::new()).await, Err(DoctorError::EmptySchedule));

        let missing_patient = days(json!({"2024-12-25": {"09:00": {"status": "reservado"}}}));
        assert_matches!(
            service.replace_days(&id, missing_patient).await,
            Err(DoctorError::Schedule(ScheduleError::MissingPatient(_)))
        );

        let valid = days(json!({"2024-12-25": {"09:00": {"status": "disponivel"}}}));
        service.replace_days(&id, valid).await.unwrap();
        assert_eq!(service.get_schedule(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_slot_requires_all_fields_and_valid_keys() {
        let (service, id) = setup().await;

        let missing = SlotUpdateRequest {
            data: Some("2024-12-25".to_string()),
            ..Default::default()
        };
        assert_matches!(service.update_slot(&id, missing).await, Err(DoctorError::MissingSlotFields));

        let bad_time = SlotUpdateRequest {
            data: Some("2024-12-25".to_string()),
            hora: Some("9h".to_string()),
            info: Some(Slot::available()),
        };
        assert_matches!(
            service.update_slot(&id, bad_time).await,
            Err(DoctorError::Schedule(ScheduleError::InvalidTime(_)))
        );

        let booked = SlotUpdateRequest {
            data: Some("2024-12-25".to_string()),
            hora: Some("09:00".to_string()),
            info: Some(Slot::booked("p1")),
        };
        service.update_slot(&id, booked).await.unwrap();

        let schedule = service.get_schedule(&id).await.unwrap();
        let slot = schedule.values().next().and_then(|day| day.values().next()).unwrap();
        assert_eq!(slot.status, SlotStatus::Reservado);
    }

    #[tokio::test]
    async fn unknown_doctor_is_not_found() {
        let (service, _) = setup().await;
        let ghost = DocumentId::generate();

        assert_matches!(service.get_schedule(&ghost).await, Err(DoctorError::NotFound));
        let request = SlotDeleteRequest {
            data: Some("2024-12-25".to_string()),
            hora: None,
        };
        assert_matches!(service.delete_slot(&ghost, request).await, Err(DoctorError::NotFound));
    }
}
