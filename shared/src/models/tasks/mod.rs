pub mod completion_signal;
pub mod worker_task;
