//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a subsystem against the
//! mock adapters in `mock_hw`. All tests run on the host with no real
//! hardware or serial link required.

mod mock_hw;
