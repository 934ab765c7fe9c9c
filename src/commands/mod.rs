pub mod detach;
pub mod init;
pub mod revert;
