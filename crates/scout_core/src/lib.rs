//! Job scout core: data model, stream update reducer and the pure search
//! session state machine.
mod effect;
mod event;
mod model;
mod msg;
mod reduce;
mod request;
mod session;
mod source;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use event::{MalformedEvent, UpdateEvent};
pub use model::{AgentStatus, JobRecord, SourceAgentState};
pub use msg::Msg;
pub use reduce::reduce;
pub use request::{ExperienceLevel, SearchRequest, ValidationError};
pub use session::SessionState;
pub use source::{Source, UnknownSource};
pub use state::{AppState, Generation};
pub use update::update;
pub use view_model::{AgentCardView, AppViewModel, SessionPhase, SummaryView};
