pub mod init_catalog;
pub mod synthetic;
