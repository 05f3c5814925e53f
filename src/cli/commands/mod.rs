pub mod context;
pub mod init;
pub mod mangle;
pub mod nls;
pub mod postprocess;
