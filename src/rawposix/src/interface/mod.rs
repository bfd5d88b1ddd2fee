// Interface between the handlers and the host: errno translation, the cwd
// lock, argument decoding, structure conversion and open handles.
pub mod errnos;
pub mod file;
pub mod fs_conv;
pub mod misc;
pub mod types;

pub use errnos::*;
pub use file::RealFd;
pub use fs_conv::*;
pub use misc::*;
pub use types::*;
