//! Dado Universe - energy-bearing units with dilated local clocks
//!
//! Units ("dados") decay, exchange energy through proximity fields and
//! explicit pulses, and age on their own clocks. A line-oriented console
//! drives the universe between ticks.

pub mod command;
pub mod core;
pub mod entity;
pub mod persistence;
pub mod pulse;
pub mod render;
pub mod runtime;
pub mod simulation;
pub mod ui;
pub mod universe;
