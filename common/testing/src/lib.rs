// Licensed under the Apache-2.0 license

//! Host-side stand-ins for the eFUSE hardware, shared by the unit tests,
//! the integration tests and the `xtask` tool.

mod efuse;
mod snapshot;

pub use efuse::{Access, FakeEfuse};
pub use snapshot::{EfuseSnapshot, SnapshotError};
