//! Cross-module scenarios

mod frame_loop;
