use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_models::error::AppError;

// =====================================================================================
// MOCK SCHEDULING API RECORDS
// =====================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockDoctor {
    pub id: u32,
    pub nome: String,
    pub especialidade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTime {
    pub horario: String,
    pub disponivel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: u32,
    pub medico_id: u32,
    pub medico_nome: String,
    pub especialidade: String,
    pub data: String,
    pub horario: String,
    pub paciente_nome: String,
    pub paciente_telefone: String,
    pub status: String,
    pub codigo_confirmacao: String,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub agendamento_id: u32,
    pub status: String,
    pub mensagem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtySummary {
    pub nome: String,
    pub quantidade_medicos: usize,
}

/// Input to a booking confirmation or its pre-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub medico_id: u32,
    pub data: String,
    pub horario: String,
    pub paciente_nome: String,
    pub paciente_telefone: String,
    pub observacoes: Option<String>,
}

// =====================================================================================
// CONVERSATION
// =====================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BuscarMedicos,
    VerificarHorarios,
    AgendarConsulta,
    CancelarAgendamento,
    ListarEspecialidades,
    ObterAjuda,
    Saudacao,
    Despedida,
    Outros,
}

impl Intent {
    pub const ALL: [Intent; 9] = [
        Intent::BuscarMedicos,
        Intent::VerificarHorarios,
        Intent::AgendarConsulta,
        Intent::CancelarAgendamento,
        Intent::ListarEspecialidades,
        Intent::ObterAjuda,
        Intent::Saudacao,
        Intent::Despedida,
        Intent::Outros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BuscarMedicos => "buscar_medicos",
            Intent::VerificarHorarios => "verificar_horarios",
            Intent::AgendarConsulta => "agendar_consulta",
            Intent::CancelarAgendamento => "cancelar_agendamento",
            Intent::ListarEspecialidades => "listar_especialidades",
            Intent::ObterAjuda => "obter_ajuda",
            Intent::Saudacao => "saudacao",
            Intent::Despedida => "despedida",
            Intent::Outros => "outros",
        }
    }

    /// Maps a model answer to an intent; anything unrecognised is `Outros`.
    pub fn from_label(label: &str) -> Self {
        let cleaned = label
            .trim()
            .trim_matches(|c: char| c == '`' || c == '"' || c == '\'' || c == '.')
            .trim()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == cleaned)
            .unwrap_or(Intent::Outros)
    }
}

/// Booking details pulled out of a free-text message. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuery {
    #[serde(default)]
    pub especialidade: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub medico_id: Option<u32>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub horario: Option<String>,
    #[serde(default)]
    pub paciente_nome: Option<String>,
    #[serde(default)]
    pub paciente_telefone: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub agendamento_id: Option<u32>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// Reads an id the model may have sent as `1`, `1.0` or `"1"`.
pub fn value_to_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_id))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    pub mensagem: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub resposta: String,
}

// =====================================================================================
// ERRORS
// =====================================================================================

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant not configured")]
    NotConfigured,

    #[error("Field 'mensagem' is required")]
    EmptyMessage,

    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::EmptyMessage => AppError::BadRequest(err.to_string()),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intent_labels_round_trip_and_fall_back() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_label(intent.as_str()), intent);
        }
        assert_eq!(Intent::from_label("  Agendar_Consulta.\n"), Intent::AgendarConsulta);
        assert_eq!(Intent::from_label("`saudacao`"), Intent::Saudacao);
        assert_eq!(Intent::from_label("marcar exame"), Intent::Outros);
        assert_eq!(Intent::from_label(""), Intent::Outros);
    }

    #[test]
    fn booking_query_accepts_loose_ids() {
        let query: BookingQuery = serde_json::from_value(json!({
            "medico_id": "2",
            "agendamento_id": 4321.0,
            "data": "2024-12-25",
            "horario": null
        }))
        .unwrap();

        assert_eq!(query.medico_id, Some(2));
        assert_eq!(query.agendamento_id, Some(4321));
        assert_eq!(query.data.as_deref(), Some("2024-12-25"));
        assert_eq!(query.horario, None);
    }

    #[test]
    fn unreadable_ids_become_none() {
        let query: BookingQuery = serde_json::from_value(json!({"medico_id": "ID do médico"})).unwrap();
        assert_eq!(query.medico_id, None);
        assert_eq!(value_to_id(&json!(-1)), None);
        assert_eq!(value_to_id(&json!(1.5)), None);
    }
}
