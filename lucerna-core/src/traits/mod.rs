//! Hardware abstraction traits
//!
//! These traits define the interface between the session engines and the
//! external collaborators supplied by the firmware host: the radio
//! transport, the light output driver, durable peer storage, and the UI.

pub mod lights;
pub mod status;
pub mod store;
pub mod transport;

pub use lights::LightSink;
pub use status::StatusSink;
pub use store::{PeerRecord, PeerStore, StoreError};
pub use transport::{Transport, TransportError};
