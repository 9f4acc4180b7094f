pub mod sweep_scheduler;
