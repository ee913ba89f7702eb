//! Functional model of the accelerator behind `DeviceCfg` / `DeviceRun`.
//!
//! The model handles the fixed reference block (1 batch row, 16 input and 16
//! output channels) and computes eagerly inside `configure`; `run` only
//! reports status.

use std::cell::RefCell;
use std::os::raw::c_void;

use log::debug;
use uma_rs::command_stream::{decode_stream, Command};
use uma_rs::ZeroPoints;

use crate::error::{DeviceError, DeviceResult};

pub const BATCH: usize = 1;
pub const BLOCK_IN: usize = 16;
pub const BLOCK_OUT: usize = 16;

pub const STATUS_OK: i32 = 0;
pub const STATUS_NOT_CONFIGURED: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Idle,
    Configured,
}

#[derive(Debug, Clone)]
pub struct RefDevice {
    state: DeviceState,
    zero_points: Option<ZeroPoints>,
    command_stream: Vec<i32>,
}

impl RefDevice {
    pub fn new() -> Self {
        Self {
            state: DeviceState::Idle,
            zero_points: None,
            command_stream: Vec::new(),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Zero points of the most recent successful configuration.
    pub fn zero_points(&self) -> Option<ZeroPoints> {
        self.zero_points
    }

    /// Command stream of the most recent successful configuration.
    pub fn command_stream(&self) -> &[i32] {
        &self.command_stream
    }

    pub fn commands(&self) -> DeviceResult<Vec<Command>> {
        decode_stream(&self.command_stream).map_err(DeviceError::from)
    }

    /// Records the operands and computes the output block. On error the device
    /// drops back to `Idle` and `output` is left untouched.
    pub fn configure(
        &mut self,
        input: &[i8],
        weight: &[i8],
        output: &mut [i32],
        input_zero_point: i32,
        weight_zero_point: i32,
        command_stream: &[i32],
    ) -> DeviceResult<()> {
        self.state = DeviceState::Idle;
        require_len("input", BATCH * BLOCK_IN, input.len())?;
        require_len("weight", BLOCK_OUT * BLOCK_IN, weight.len())?;
        require_len("output", BATCH * BLOCK_OUT, output.len())?;

        for i in 0..BATCH {
            for j in 0..BLOCK_OUT {
                let mut acc = 0i32;
                for k in 0..BLOCK_IN {
                    let x = (input[i * BLOCK_IN + k] as i32).wrapping_sub(input_zero_point);
                    let w = (weight[j * BLOCK_IN + k] as i32).wrapping_sub(weight_zero_point);
                    acc = acc.wrapping_add(x.wrapping_mul(w));
                }
                output[i * BLOCK_OUT + j] = acc;
            }
        }

        self.zero_points = Some(ZeroPoints::new(input_zero_point, weight_zero_point));
        self.command_stream = command_stream.to_vec();
        self.state = DeviceState::Configured;
        debug!(
            "reference device configured with {} command word(s)",
            command_stream.len()
        );
        Ok(())
    }

    /// Completes the configured job. Returns `STATUS_NOT_CONFIGURED` when
    /// nothing was configured since the last run.
    pub fn run(&mut self) -> i32 {
        match self.state {
            DeviceState::Configured => {
                self.state = DeviceState::Idle;
                debug!("reference device run completed");
                STATUS_OK
            }
            DeviceState::Idle => {
                debug!("reference device run without configuration");
                STATUS_NOT_CONFIGURED
            }
        }
    }

    /// Returns the device to `Idle` without running.
    pub fn reset(&mut self) {
        self.state = DeviceState::Idle;
    }
}

impl Default for RefDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn require_len(operand: &'static str, needed: usize, found: usize) -> DeviceResult<()> {
    if found < needed {
        return Err(DeviceError::BufferTooSmall {
            operand,
            needed,
            found,
        });
    }
    Ok(())
}

thread_local! {
    static THREAD_DEVICE: RefCell<RefDevice> = RefCell::new(RefDevice::new());
}

/// Runs `f` against the device instance that backs the C entry points on the
/// current thread.
pub fn with_thread_device<R>(f: impl FnOnce(&mut RefDevice) -> R) -> R {
    THREAD_DEVICE.with(|device| f(&mut *device.borrow_mut()))
}

/// # Safety
/// `input` must point to `BATCH * BLOCK_IN` readable bytes, `weight` to
/// `BLOCK_OUT * BLOCK_IN` readable bytes, `output` to `BATCH * BLOCK_OUT`
/// writable `int32_t`s, and `cms_data` to `cms_data_size` readable `int32_t`s.
/// Null pointers leave the device idle so the following `DeviceRun` fails.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn DeviceCfg(
    input: *mut i8,
    weight: *mut i8,
    output: *mut i32,
    input_zp: i32,
    weight_zp: i32,
    cms_data: *mut c_void,
    cms_data_size: usize,
) {
    if input.is_null() || weight.is_null() || output.is_null() {
        with_thread_device(RefDevice::reset);
        return;
    }
    let command_stream: &[i32] = if cms_data.is_null() || cms_data_size == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(cms_data as *const i32, cms_data_size) }
    };
    let input = unsafe { std::slice::from_raw_parts(input as *const i8, BATCH * BLOCK_IN) };
    let weight =
        unsafe { std::slice::from_raw_parts(weight as *const i8, BLOCK_OUT * BLOCK_IN) };
    let output = unsafe { std::slice::from_raw_parts_mut(output, BATCH * BLOCK_OUT) };

    with_thread_device(|device| {
        if let Err(err) =
            device.configure(input, weight, output, input_zp, weight_zp, command_stream)
        {
            debug!("DeviceCfg rejected: {err}");
        }
    });
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn DeviceRun() -> i32 {
    with_thread_device(RefDevice::run)
}
