pub mod application;
pub mod event;
pub mod interview;
pub mod labels;
pub mod resume;
pub mod survey;

pub use application::ApplicationRow;
pub use event::EventRow;
pub use interview::InterviewRow;
pub use resume::ResumeRow;
pub use survey::SurveyRow;
