//! Fuzz target: `Command::parse`
//!
//! Arbitrary verified-frame payloads must either parse into a command or
//! return a typed error — never panic, never read out of bounds.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use calbox::session::command::Command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = Command::parse(data);
});
