pub mod assistant;
pub mod gemini;
pub mod llm;
pub mod mock_api;
pub mod prompts;
pub mod tools;

pub use assistant::Assistant;
pub use gemini::GeminiClient;
pub use llm::LanguageModel;
pub use mock_api::MockSchedulingApi;
pub use tools::Toolbox;
