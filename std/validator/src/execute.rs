//! Execution boundary for approved commands.
//!
//! Nothing here spawns a process. Approved commands only produce a
//! simulated output line.

/// Describe the command that would have been executed.
pub fn simulate(command: &str) -> String {
    format!("[SIMULATED] Command '{command}' would be executed here")
}
