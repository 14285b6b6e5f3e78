//! Text buffers for function editors and tracer frames.

pub mod buffer;

pub use buffer::EditorWindow;
