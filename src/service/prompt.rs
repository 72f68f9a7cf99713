use crate::types::chat::ConversationMessage;
use crate::types::gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

/// Reply used when the model answers without any text.
pub const FALLBACK_REPLY: &str = "Desculpe, não consegui gerar uma resposta.";

/// Reply sent alongside a 500 from the chat endpoint.
pub const ERROR_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente.";

const PERSONA: &str = "Você é um assistente analista de dados profissional da Alpha Insights.
Seu papel é ajudar usuários a entender e analisar dados de planilhas do Google Drive.

Tom: Educado, atencioso e profissional.
Estilo: Claro e objetivo nas respostas.";

const NO_DATA: &str = "No momento, não há planilhas disponíveis para análise.";

const RESPONSE_DIRECTIVES: &str = "Quando responder:
1. Seja específico e cite os dados relevantes
2. Indique de qual planilha veio a informação
3. Forneça insights e análises quando apropriado
4. Se não houver dados suficientes, seja honesto sobre as limitações";

pub fn generation_config() -> GenerationConfig {
    GenerationConfig {
        temperature: 0.7,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 2048,
    }
}

/// Persona, tone, sheet context (or the no-data notice) and answer rules.
pub fn system_instruction(digest: &str) -> String {
    let context = if digest.is_empty() {
        NO_DATA.to_string()
    } else {
        format!(
            "Você tem acesso às seguintes planilhas:\n{digest}\n\nSempre cite qual planilha você está usando nas suas respostas."
        )
    };
    format!("{PERSONA}\n\n{context}\n\n{RESPONSE_DIRECTIVES}")
}

/// Instruction first (as a user turn), then the history in order with roles remapped.
pub fn build_request(digest: &str, history: &[ConversationMessage]) -> GenerateContentRequest {
    let instruction = Content {
        role: "user".to_string(),
        parts: vec![Part::text(system_instruction(digest))],
    };
    let contents = std::iter::once(instruction)
        .chain(history.iter().map(|msg| Content {
            role: msg.role.gemini_role().to_string(),
            parts: vec![Part::text(msg.content.clone())],
        }))
        .collect();

    GenerateContentRequest {
        contents,
        generation_config: generation_config(),
    }
}

pub fn reply_or_fallback(response: &GenerateContentResponse) -> String {
    response
        .reply_text()
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}
