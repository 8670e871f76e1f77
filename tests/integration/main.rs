//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the public API against
//! mock or simulated radios.  All tests run on the host with no real
//! hardware required.

mod mock_radio;
mod sim_link_tests;
