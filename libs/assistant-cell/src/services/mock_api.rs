use rand::Rng;
use tracing::debug;

use crate::models::{AvailableTime, Booking, BookingRequest, Cancellation, MockDoctor};

const DEFAULT_AVAILABILITY: f64 = 0.7;
const FIRST_HOUR: u32 = 8;
const LAST_HOUR: u32 = 16;

/// In-memory stand-in for a scheduling backend: four fixed doctors, randomly
/// generated availability and confirmation codes.
pub struct MockSchedulingApi {
    doctors: Vec<MockDoctor>,
    availability: f64,
}

impl Default for MockSchedulingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSchedulingApi {
    pub fn new() -> Self {
        Self::with_availability(DEFAULT_AVAILABILITY)
    }

    /// `availability` is the chance that each half-hour slot is offered.
    pub fn with_availability(availability: f64) -> Self {
        let doctor = |id, nome: &str, especialidade: &str| MockDoctor {
            id,
            nome: nome.to_string(),
            especialidade: especialidade.to_string(),
        };

        Self {
            doctors: vec![
                doctor(1, "Dr. João Silva", "Cardiologia"),
                doctor(2, "Dra. Maria Santos", "Dermatologia"),
                doctor(3, "Dr. Pedro Costa", "Ortopedia"),
                doctor(4, "Dra. Ana Oliveira", "Pediatria"),
            ],
            availability: availability.clamp(0.0, 1.0),
        }
    }

    pub fn doctors(&self) -> &[MockDoctor] {
        &self.doctors
    }

    pub fn find_doctor(&self, doctor_id: u32) -> Option<&MockDoctor> {
        self.doctors.iter().find(|d| d.id == doctor_id)
    }

    /// Case-insensitive substring match on the specialty; `None` lists everyone.
    pub fn search_doctors(&self, specialty: Option<&str>) -> Vec<MockDoctor> {
        match specialty.map(str::trim).filter(|s| !s.is_empty()) {
            Some(specialty) => {
                let needle = specialty.to_lowercase();
                self.doctors
                    .iter()
                    .filter(|d| d.especialidade.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
            None => self.doctors.clone(),
        }
    }

    /// 08:00 to 16:30 in 30-minute steps, each kept with the configured probability.
    /// The doctor and date are not checked.
    pub fn available_slots(&self, doctor_id: u32, date: &str) -> Vec<AvailableTime> {
        let mut rng = rand::thread_rng();
        let mut slots = Vec::new();

        for hour in FIRST_HOUR..=LAST_HOUR {
            for minute in [0, 30] {
                if rng.gen_bool(self.availability) {
                    slots.push(AvailableTime {
                        horario: format!("{:02}:{:02}", hour, minute),
                        disponivel: true,
                    });
                }
            }
        }

        debug!("Generated {} slots for doctor {} on {}", slots.len(), doctor_id, date);
        slots
    }

    /// Returns `None` when the doctor does not exist.
    pub fn confirm_booking(&self, request: &BookingRequest) -> Option<Booking> {
        let doctor = self.find_doctor(request.medico_id)?;
        let id = rand::thread_rng().gen_range(1000..=9999);

        Some(Booking {
            id,
            medico_id: doctor.id,
            medico_nome: doctor.nome.clone(),
            especialidade: doctor.especialidade.clone(),
            data: request.data.clone(),
            horario: request.horario.clone(),
            paciente_nome: request.paciente_nome.clone(),
            paciente_telefone: request.paciente_telefone.clone(),
            status: "confirmado".to_string(),
            codigo_confirmacao: format!("AGD{}", id),
            observacoes: request.observacoes.clone(),
        })
    }

    pub fn cancel_booking(&self, booking_id: u32) -> Cancellation {
        Cancellation {
            agendamento_id: booking_id,
            status: "cancelado".to_string(),
            mensagem: "Agendamento cancelado com sucesso".to_string(),
        }
    }
}
