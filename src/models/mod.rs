pub mod task;
pub mod user;

pub use task::{
    SortOrder, Task, TaskInput, TaskPatch, TaskPriority, TaskQuery, TaskSort, TaskStatusFilter,
    TaskUpdate,
};
pub use user::{NewUser, User};
