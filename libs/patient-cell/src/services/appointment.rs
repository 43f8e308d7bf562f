use std::sync::Arc;

use tracing::debug;

use shared_database::{AppState, DocumentId, DocumentStore, ScheduleRepository};
use shared_models::schedule::{parse_date, Appointment, Schedule, SlotTime};

use crate::models::{
    AppointmentDeleteRequest, AppointmentUpdateRequest, PatientError, APPOINTMENTS_FIELD, PATIENTS_COLLECTION,
};

/// The `consultas` map of a patient: date → time → appointment.
pub struct AppointmentService {
    store: Arc<dyn DocumentStore>,
}

impl AppointmentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    fn repository(&self) -> ScheduleRepository<'_> {
        ScheduleRepository::new(&*self.store, PATIENTS_COLLECTION, APPOINTMENTS_FIELD)
    }

    pub async fn get_appointments(&self, patient_id: &DocumentId) -> Result<Schedule<Appointment>, PatientError> {
        debug!("Fetching appointments of patient {}", patient_id);

        self.repository()
            .load(patient_id)
            .await?
            .ok_or(PatientError::NotFound)
    }

    pub async fn add_days(&self, patient_id: &DocumentId, days: Schedule<Appointment>) -> Result<(), PatientError> {
        if days.is_empty() {
            return Err(PatientError::EmptyAppointments);
        }
        debug!("Adding {} day(s) of appointments to patient {}", days.len(), patient_id);

        if !self.repository().merge_days(patient_id, &days).await? {
            return Err(PatientError::NotFound);
        }
        Ok(())
    }

    pub async fn update_appointment(
        &self,
        patient_id: &DocumentId,
        request: AppointmentUpdateRequest,
    ) -> Result<(), PatientError> {
        let (date, time, details) = match (request.data, request.hora, request.detalhes) {
            (Some(date), Some(time), Some(details)) if !date.is_empty() && !time.is_empty() => (date, time, details),
            _ => return Err(PatientError::MissingAppointmentFields),
        };
        let date = parse_date(&date)?;
        let time: SlotTime = time.parse()?;
        debug!("Setting appointment {} {} of patient {}", date, time, patient_id);

        if !self.repository().set_entry(patient_id, date, time, &details).await? {
            return Err(PatientError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_appointment(
        &self,
        patient_id: &DocumentId,
        request: AppointmentDeleteRequest,
    ) -> Result<(), PatientError> {
        let date = match request.data {
            Some(date) if !date.is_empty() => parse_date(&date)?,
            _ => return Err(PatientError::MissingDate),
        };
        let time = match request.hora {
            Some(time) if !time.is_empty() => Some(time.parse::<SlotTime>()?),
            _ => None,
        };
        debug!("Removing appointment {} {:?} from patient {}", date, time, patient_id);

        if !self.repository().remove_entry(patient_id, date, time).await? {
            return Err(PatientError::NotFound);
        }
        Ok(())
    }
}
