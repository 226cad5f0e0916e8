pub mod controller;
pub mod filter;
pub mod task_ops;
