pub mod file;
pub mod policy;
pub mod stdin;
