pub mod category;
pub mod course;
pub mod lifecycle;
pub mod topic;

pub use category::{Category, SelectOption};
pub use course::{Course, CourseForm};
pub use lifecycle::Lifecycle;
pub use topic::{Topic, TopicForm};
