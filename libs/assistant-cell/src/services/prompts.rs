use crate::models::{AvailableTime, Booking, MockDoctor, SpecialtySummary};

pub const FALLBACK_REPLY: &str = "Desculpe, não consegui processar sua mensagem.";

pub fn error_reply(error: &str) -> String {
    format!("Desculpe, ocorreu um erro ao processar sua solicitação: {}", error)
}

pub const SYSTEM_PROMPT: &str = "Você é a Lia, assistente virtual especializada em agendamento de consultas médicas.

INSTRUÇÕES:
1. Seja cordial e profissional
2. Use as ferramentas disponíveis para ajudar o usuário
3. Confirme os dados antes de agendar consultas
4. Forneça informações claras e precisas

FUNCIONALIDADES:
- Buscar médicos por especialidade
- Verificar horários disponíveis
- Agendar e cancelar consultas
- Listar especialidades
- Validar dados de agendamento

FORMATOS:
- Data: YYYY-MM-DD (ex: 2024-12-25)
- Horário: HH:MM (ex: 14:30)

Mantenha sempre um tom profissional mas amigável.";

pub const CLASSIFY_PROMPT: &str = "Analise a mensagem do usuário e classifique a intenção em uma das categorias:
- buscar_medicos: quer buscar médicos ou especialidades
- verificar_horarios: quer verificar horários disponíveis
- agendar_consulta: quer agendar uma consulta
- cancelar_agendamento: quer cancelar um agendamento
- listar_especialidades: quer ver a lista de especialidades
- obter_ajuda: precisa de ajuda ou informações
- saudacao: está cumprimentando
- despedida: está se despedindo
- outros: qualquer outra intenção

Responda apenas com o nome da intenção.";

pub const EXTRACT_PROMPT: &str = "Extraia as informações de agendamento da mensagem e retorne um JSON:
{
  \"especialidade\": \"especialidade médica ou null\",
  \"medico_id\": \"ID do médico ou null\",
  \"data\": \"data no formato YYYY-MM-DD ou null\",
  \"horario\": \"horário no formato HH:MM ou null\",
  \"paciente_nome\": \"nome do paciente ou null\",
  \"paciente_telefone\": \"telefone do paciente ou null\",
  \"agendamento_id\": \"ID do agendamento ou null\",
  \"observacoes\": \"observações ou null\"
}

Use null para o que não estiver presente. Retorne apenas o JSON.";

pub fn format_doctors(doctors: &[MockDoctor]) -> String {
    if doctors.is_empty() {
        return "Desculpe, não encontrei médicos disponíveis para a especialidade solicitada.".to_string();
    }

    let lines: Vec<String> = doctors
        .iter()
        .map(|d| format!("• ID: {} | {} | {}", d.id, d.nome, d.especialidade))
        .collect();
    format!("Médicos disponíveis:\n{}", lines.join("\n"))
}

pub fn format_slots(slots: &[AvailableTime]) -> String {
    if slots.is_empty() {
        return "Desculpe, não há horários disponíveis para a data solicitada.".to_string();
    }

    let lines: Vec<String> = slots
        .iter()
        .map(|s| format!("• {} - {}", s.horario, if s.disponivel { "Disponível" } else { "Ocupado" }))
        .collect();
    format!("Horários disponíveis:\n{}", lines.join("\n"))
}

pub fn format_booking(booking: &Booking) -> String {
    let mut text = format!(
        "✅ Agendamento confirmado com sucesso!\n\n\
         📋 Detalhes do Agendamento:\n\
         • ID: {}\n\
         • Médico: {}\n\
         • Especialidade: {}\n\
         • Data: {}\n\
         • Horário: {}\n\
         • Paciente: {}\n\
         • Telefone: {}\n\
         • Status: {}\n\
         • Código de Confirmação: {}\n",
        booking.id,
        booking.medico_nome,
        booking.especialidade,
        booking.data,
        booking.horario,
        booking.paciente_nome,
        booking.paciente_telefone,
        booking.status,
        booking.codigo_confirmacao,
    );
    if let Some(notes) = &booking.observacoes {
        text.push_str(&format!("• Observações: {}\n", notes));
    }
    text.push_str("\nObrigado por escolher nossos serviços!");
    text
}

pub fn format_specialties(specialties: &[SpecialtySummary]) -> String {
    let lines: Vec<String> = specialties
        .iter()
        .map(|s| format!("• {} ({} médicos disponíveis)", s.nome, s.quantidade_medicos))
        .collect();
    format!("Especialidades disponíveis:\n{}", lines.join("\n"))
}

pub const HELP_TEXT: &str = "🤖 Lia - Agendamento de Consultas

📋 Funcionalidades disponíveis:
• Buscar médicos por especialidade
• Verificar horários disponíveis
• Agendar consultas
• Cancelar agendamentos
• Listar especialidades disponíveis

💡 Exemplos de uso:
• \"Quero ver os médicos de cardiologia\"
• \"Quais horários tem o médico 1 para amanhã?\"
• \"Quero agendar consulta com médico 1, dia 25/12/2024 às 14:30\"
• \"Quais especialidades vocês têm?\"

Como posso ajudar você hoje?";
