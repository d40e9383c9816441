// Library surface for headless/integration tests and reuse.
// The binary in main.rs is a thin TUI over these modules.
pub mod clock;
pub mod frame_loop;
pub mod keystroke;
pub mod metrics;
pub mod mistakes;
pub mod particles;
pub mod persist;
pub mod prompts;
pub mod session;
