use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::models::{value_to_id, BookingRequest, SpecialtySummary};
use crate::services::llm::FunctionDeclaration;
use crate::services::mock_api::MockSchedulingApi;
use crate::services::prompts::{format_booking, format_doctors, format_slots, format_specialties};

pub const SEARCH_DOCTORS: &str = "buscar_medicos";
pub const AVAILABLE_SLOTS: &str = "buscar_horarios_disponiveis";
pub const CONFIRM_BOOKING: &str = "confirmar_agendamento";
pub const CANCEL_BOOKING: &str = "cancelar_agendamento";
pub const LIST_SPECIALTIES: &str = "listar_especialidades";
pub const VALIDATE_BOOKING: &str = "validar_dados_agendamento";

const PHONE_SEPARATORS: [char; 5] = ['+', '-', '(', ')', ' '];

/// The tools offered to the model. Every tool answers with display text,
/// including its failures, so the model can relay them.
pub struct Toolbox {
    api: MockSchedulingApi,
}

impl Default for Toolbox {
    fn default() -> Self {
        Self::new(MockSchedulingApi::new())
    }
}

fn arg_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn arg_id(args: &Value, key: &str) -> Option<u32> {
    args.get(key).and_then(value_to_id)
}

fn missing(key: &str) -> String {
    format!("Erro: parâmetro '{}' é obrigatório.", key)
}

fn booking_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "medico_id": {"type": "integer", "description": "ID do médico"},
            "data": {"type": "string", "description": "Data do agendamento (YYYY-MM-DD)"},
            "horario": {"type": "string", "description": "Horário do agendamento (HH:MM)"},
            "paciente_nome": {"type": "string", "description": "Nome completo do paciente"},
            "paciente_telefone": {"type": "string", "description": "Telefone do paciente"},
            "observacoes": {"type": "string", "description": "Observações adicionais"}
        },
        "required": ["medico_id", "data", "horario", "paciente_nome", "paciente_telefone"]
    })
}

impl Toolbox {
    pub fn new(api: MockSchedulingApi) -> Self {
        Self { api }
    }

    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        let declare = |name: &str, description: &str, parameters: Value| FunctionDeclaration {
            name: name.to_string(),
            description: description.to_string(),
            parameters: Some(parameters),
        };

        vec![
            declare(
                SEARCH_DOCTORS,
                "Busca médicos disponíveis, opcionalmente filtrando por especialidade.",
                json!({
                    "type": "object",
                    "properties": {
                        "especialidade": {"type": "string", "description": "Especialidade desejada"}
                    }
                }),
            ),
            declare(
                AVAILABLE_SLOTS,
                "Busca horários disponíveis de um médico em uma data.",
                json!({
                    "type": "object",
                    "properties": {
                        "medico_id": {"type": "integer", "description": "ID do médico"},
                        "data": {"type": "string", "description": "Data no formato YYYY-MM-DD"}
                    },
                    "required": ["medico_id", "data"]
                }),
            ),
            declare(CONFIRM_BOOKING, "Confirma um agendamento com os dados fornecidos.", booking_schema()),
            declare(
                CANCEL_BOOKING,
                "Cancela um agendamento existente.",
                json!({
                    "type": "object",
                    "properties": {
                        "agendamento_id": {"type": "integer", "description": "ID do agendamento"}
                    },
                    "required": ["agendamento_id"]
                }),
            ),
            // An object schema with no properties is rejected by the hosted API.
            FunctionDeclaration {
                name: LIST_SPECIALTIES.to_string(),
                description: "Lista as especialidades médicas disponíveis.".to_string(),
                parameters: None,
            },
            declare(
                VALIDATE_BOOKING,
                "Valida os dados de um agendamento antes da confirmação.",
                booking_schema(),
            ),
        ]
    }

    /// Runs the named tool with the model-supplied arguments.
    pub fn execute(&self, name: &str, args: &Value) -> String {
        debug!("Executing tool {} with {}", name, args);

        match name {
            SEARCH_DOCTORS => self.search_doctors(arg_str(args, "especialidade").as_deref()),
            AVAILABLE_SLOTS => match (arg_id(args, "medico_id"), arg_str(args, "data")) {
                (Some(doctor_id), Some(date)) => self.available_slots(doctor_id, &date),
                (None, _) => missing("medico_id"),
                (_, None) => missing("data"),
            },
            CONFIRM_BOOKING => match Self::booking_request(args) {
                Ok(request) => self.confirm_booking(&request),
                Err(message) => message,
            },
            CANCEL_BOOKING => match arg_id(args, "agendamento_id") {
                Some(booking_id) => self.cancel_booking(booking_id),
                None => missing("agendamento_id"),
            },
            LIST_SPECIALTIES => self.list_specialties(),
            VALIDATE_BOOKING => match Self::booking_request(args) {
                Ok(request) => self.validate_booking(&request),
                Err(message) => message,
            },
            other => {
                warn!("Model requested unknown tool {}", other);
                format!("Erro: ferramenta '{}' desconhecida.", other)
            }
        }
    }

    fn booking_request(args: &Value) -> Result<BookingRequest, String> {
        Ok(BookingRequest {
            medico_id: arg_id(args, "medico_id").ok_or_else(|| missing("medico_id"))?,
            data: arg_str(args, "data").ok_or_else(|| missing("data"))?,
            horario: arg_str(args, "horario").ok_or_else(|| missing("horario"))?,
            paciente_nome: arg_str(args, "paciente_nome").ok_or_else(|| missing("paciente_nome"))?,
            paciente_telefone: arg_str(args, "paciente_telefone").ok_or_else(|| missing("paciente_telefone"))?,
            observacoes: arg_str(args, "observacoes"),
        })
    }

    pub fn search_doctors(&self, specialty: Option<&str>) -> String {
        format_doctors(&self.api.search_doctors(specialty))
    }

    pub fn available_slots(&self, doctor_id: u32, date: &str) -> String {
        format_slots(&self.api.available_slots(doctor_id, date))
    }

    pub fn confirm_booking(&self, request: &BookingRequest) -> String {
        match self.api.confirm_booking(request) {
            Some(booking) => format_booking(&booking),
            None => "Erro no agendamento: Médico não encontrado".to_string(),
        }
    }

    pub fn cancel_booking(&self, booking_id: u32) -> String {
        let cancellation = self.api.cancel_booking(booking_id);
        format!("Agendamento {} cancelado com sucesso. {}", cancellation.agendamento_id, cancellation.mensagem)
    }

    /// Specialties in order of first appearance, with their doctor counts.
    pub fn list_specialties(&self) -> String {
        let mut specialties: Vec<SpecialtySummary> = Vec::new();
        for doctor in self.api.doctors() {
            match specialties.iter_mut().find(|s| s.nome == doctor.especialidade) {
                Some(existing) => existing.quantidade_medicos += 1,
                None => specialties.push(SpecialtySummary {
                    nome: doctor.especialidade.clone(),
                    quantidade_medicos: 1,
                }),
            }
        }
        format_specialties(&specialties)
    }

    /// Checks, in order: doctor, slot availability, phone characters, name length.
    pub fn validate_booking(&self, request: &BookingRequest) -> String {
        if self.api.find_doctor(request.medico_id).is_none() {
            return "Erro: Médico não encontrado. Verifique o ID do médico.".to_string();
        }

        let slot_open = self
            .api
            .available_slots(request.medico_id, &request.data)
            .iter()
            .any(|slot| slot.horario == request.horario && slot.disponivel);
        if !slot_open {
            return format!(
                "Erro: Horário {} não está disponível para a data {}.",
                request.horario, request.data
            );
        }

        let digits: String = request
            .paciente_telefone
            .chars()
            .filter(|c| !PHONE_SEPARATORS.contains(c))
            .collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return "Erro: Formato de telefone inválido.".to_string();
        }

        if request.paciente_nome.trim().chars().count() < 2 {
            return "Erro: Nome do paciente deve ter pelo menos 2 caracteres.".to_string();
        }

        "Dados válidos. Pronto para confirmar o agendamento.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_open() -> Toolbox {
        Toolbox::new(MockSchedulingApi::with_availability(1.0))
    }

    fn booking_args() -> Value {
        json!({
            "medico_id": 1,
            "data": "2024-12-25",
            "horario": "14:30",
            "paciente_nome": "Carlos Souza",
            "paciente_telefone": "+55 (11) 99999-0000"
        })
    }

    #[test]
    fn declares_six_tools_with_object_schemas() {
        let declarations = Toolbox::default().declarations();
        let names: Vec<&str> = declarations.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(
            names,
            vec![SEARCH_DOCTORS, AVAILABLE_SLOTS, CONFIRM_BOOKING, CANCEL_BOOKING, LIST_SPECIALTIES, VALIDATE_BOOKING]
        );
        for declaration in &declarations {
            match &declaration.parameters {
                Some(schema) => {
                    assert_eq!(schema["type"], "object", "{}", declaration.name);
                    assert!(!schema["properties"].as_object().unwrap().is_empty(), "{}", declaration.name);
                }
                None => assert_eq!(declaration.name, LIST_SPECIALTIES),
            }
        }
    }

    #[test]
    fn validation_accepts_good_data() {
        let tools = always_open();
        assert_eq!(
            tools.execute(VALIDATE_BOOKING, &booking_args()),
            "Dados válidos. Pronto para confirmar o agendamento."
        );
    }

    #[test]
    fn validation_reports_first_failure() {
        let tools = always_open();

        let mut args = booking_args();
        args["medico_id"] = json!(42);
        assert!(tools.execute(VALIDATE_BOOKING, &args).contains("Médico não encontrado"));

        let mut args = booking_args();
        args["horario"] = json!("17:00");
        assert!(tools.execute(VALIDATE_BOOKING, &args).contains("não está disponível"));

        let mut args = booking_args();
        args["paciente_telefone"] = json!("11 9999-abcd");
        assert!(tools.execute(VALIDATE_BOOKING, &args).contains("telefone inválido"));

        let mut args = booking_args();
        args["paciente_nome"] = json!(" C ");
        assert!(tools.execute(VALIDATE_BOOKING, &args).contains("pelo menos 2 caracteres"));

        let closed = Toolbox::new(MockSchedulingApi::with_availability(0.0));
        assert!(closed.execute(VALIDATE_BOOKING, &booking_args()).contains("não está disponível"));
    }

    #[test]
    fn confirm_and_cancel() {
        let tools = always_open();

        let confirmed = tools.execute(CONFIRM_BOOKING, &booking_args());
        assert!(confirmed.contains("Agendamento confirmado"));
        assert!(confirmed.contains("Dr. João Silva"));
        assert!(confirmed.contains("AGD"));

        let mut args = booking_args();
        args["medico_id"] = json!("7");
        assert_eq!(tools.execute(CONFIRM_BOOKING, &args), "Erro no agendamento: Médico não encontrado");

        assert!(tools
            .execute(CANCEL_BOOKING, &json!({"agendamento_id": 4321.0}))
            .starts_with("Agendamento 4321 cancelado"));
    }

    #[test]
    fn lists_and_searches() {
        let tools = always_open();

        let specialties = tools.execute(LIST_SPECIALTIES, &json!({}));
        assert!(specialties.contains("• Cardiologia (1 médicos disponíveis)"));
        assert_eq!(specialties.lines().count(), 5);

        assert!(tools.execute(SEARCH_DOCTORS, &json!({"especialidade": "pedia"})).contains("Dra. Ana Oliveira"));
        assert_eq!(tools.execute(AVAILABLE_SLOTS, &json!({"medico_id": 2, "data": "2024-12-25"})).lines().count(), 19);
    }

    #[test]
    fn bad_calls_are_reported_as_text() {
        let tools = always_open();

        assert_eq!(tools.execute(AVAILABLE_SLOTS, &json!({"data": "2024-12-25"})), missing("medico_id"));
        assert_eq!(tools.execute(CANCEL_BOOKING, &json!({})), missing("agendamento_id"));
        assert!(tools.execute("apagar_tudo", &json!({})).contains("desconhecida"));
    }
}
