pub mod task;
pub mod user;

pub use task::{DueFilter, Task, TaskInput, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{User, UserRecord};
