pub mod sequencer;
pub mod session_usecase;
pub mod transcript;

pub use sequencer::{CompletedAnalysis, ResultSequencer};
pub use session_usecase::AnalysisSession;
pub use transcript::{MessageSender, PENDING_MESSAGE, SessionEvent, TranscriptEntry, WELCOME_MESSAGE};
