pub mod task;
pub mod token;
pub mod user;

pub use task::{Task, TaskInput, TaskPriority, TaskStatus};
pub use token::SessionToken;
pub use user::{User, UserProfile};
