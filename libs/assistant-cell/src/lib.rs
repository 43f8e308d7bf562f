// =====================================================================================
// ASSISTANT CELL - "LIA" SCHEDULING CHATBOT
// =====================================================================================
//
// Intent classification and tool dispatch in front of a mocked scheduling API and a
// hosted Gemini model. Nothing here touches the clinic's document store.
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AssistantError, BookingQuery, Intent};
pub use router::assistant_routes;
pub use services::{Assistant, GeminiClient, LanguageModel, MockSchedulingApi, Toolbox};
