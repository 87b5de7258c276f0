//! # Ports Layer
//!
//! - `inbound`: APIs this subsystem offers (driving ports)
//! - `outbound`: collaborators this subsystem needs (driven ports)

pub mod inbound;
pub mod outbound;
