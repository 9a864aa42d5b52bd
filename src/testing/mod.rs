//! Test-only support: a simulator for the generated assembly.

pub mod hack_cpu;
