#[path = "integration/common.rs"]
mod common;

#[path = "integration/check_command.rs"]
mod check_command;

#[path = "integration/analyze_command.rs"]
mod analyze_command;
