//! Background Tasks Module

pub mod sweeper;

pub use sweeper::spawn_sweep_task;
