//! Reference model of the offload accelerator.
//!
//! Provides the `DeviceCfg` / `DeviceRun` entry points that generated C modules
//! call, backed by a software device, plus scalar reference kernels used as
//! numeric oracles in tests.

pub mod device;
pub mod error;
pub mod kernels;

pub use device::{
    with_thread_device, DeviceCfg, DeviceRun, DeviceState, RefDevice, STATUS_NOT_CONFIGURED,
    STATUS_OK,
};
pub use error::{DeviceError, DeviceResult};
pub use kernels::{dense, qnn_dense, qnn_relu, relu, DenseDims};
