//! Connection layer: SSH acceptor, host identity, channel input decoding
//! and the role model.

pub mod hostkey;
pub mod input;
pub mod roles;
pub mod server;
pub mod session;

pub use roles::Role;
pub use server::BbsServer;
