mod multisig;
mod rpc;
mod shell;

pub use multisig::*;
pub use rpc::*;
pub use shell::*;
