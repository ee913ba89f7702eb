//! Scalar reference kernels for the operators the accelerator offloads.
//!
//! These are correctness oracles for hand-built tensors, not an execution
//! path: plain loops, row-major layouts, no hidden state.

use uma_rs::ZeroPoints;

use crate::error::{DeviceError, DeviceResult};

/// Fully-connected layer shape: input is `hidden x ilen`, weight is
/// `olen x ilen`, output is `hidden x olen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenseDims {
    pub hidden: usize,
    pub ilen: usize,
    pub olen: usize,
}

impl DenseDims {
    pub fn new(hidden: usize, ilen: usize, olen: usize) -> Self {
        Self { hidden, ilen, olen }
    }

    fn input_len(&self) -> DeviceResult<usize> {
        checked_len("input", self.hidden, self.ilen)
    }

    fn weight_len(&self) -> DeviceResult<usize> {
        checked_len("weight", self.olen, self.ilen)
    }

    fn output_len(&self) -> DeviceResult<usize> {
        checked_len("output", self.hidden, self.olen)
    }
}

fn checked_len(operand: &'static str, rows: usize, cols: usize) -> DeviceResult<usize> {
    rows.checked_mul(cols)
        .ok_or(DeviceError::DimensionOverflow { operand })
}

fn expect_len(operand: &'static str, expected: usize, found: usize) -> DeviceResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(DeviceError::ShapeMismatch {
            operand,
            expected,
            found,
        })
    }
}

/// Quantized dense: `out[i][j] = bias[i][j] + sum_k (in[i][k] - zp_in) * (w[j][k] - zp_w)`,
/// accumulated in 32 bits with two's-complement wrap-around.
pub fn qnn_dense(
    input: &[i8],
    weight: &[i8],
    bias: &[i32],
    dims: DenseDims,
    zero_points: ZeroPoints,
) -> DeviceResult<Vec<i32>> {
    expect_len("input", dims.input_len()?, input.len())?;
    expect_len("weight", dims.weight_len()?, weight.len())?;
    let out_len = dims.output_len()?;
    expect_len("bias", out_len, bias.len())?;

    let mut out = vec![0i32; out_len];
    for i in 0..dims.hidden {
        let row = &input[i * dims.ilen..(i + 1) * dims.ilen];
        for j in 0..dims.olen {
            let filter = &weight[j * dims.ilen..(j + 1) * dims.ilen];
            let acc = row.iter().zip(filter).fold(0i32, |acc, (&x, &w)| {
                let x = (x as i32).wrapping_sub(zero_points.input);
                let w = (w as i32).wrapping_sub(zero_points.weight);
                acc.wrapping_add(x.wrapping_mul(w))
            });
            let idx = i * dims.olen + j;
            out[idx] = acc.wrapping_add(bias[idx]);
        }
    }
    Ok(out)
}

/// Clamps wide values into the int8 range `[-128, 127]`.
pub fn qnn_relu(input: &[i32]) -> Vec<i8> {
    input
        .iter()
        .map(|&value| value.clamp(i8::MIN as i32, i8::MAX as i32) as i8)
        .collect()
}

pub fn dense(input: &[f32], weight: &[f32], dims: DenseDims) -> DeviceResult<Vec<f32>> {
    expect_len("input", dims.input_len()?, input.len())?;
    expect_len("weight", dims.weight_len()?, weight.len())?;

    let mut out = vec![0.0f32; dims.output_len()?];
    for i in 0..dims.hidden {
        let row = &input[i * dims.ilen..(i + 1) * dims.ilen];
        for j in 0..dims.olen {
            let filter = &weight[j * dims.ilen..(j + 1) * dims.ilen];
            out[i * dims.olen + j] = row.iter().zip(filter).map(|(x, w)| x * w).sum();
        }
    }
    Ok(out)
}

/// `max(x, 0)`; NaN and negative zero map to `0.0`.
pub fn relu(input: &[f32]) -> Vec<f32> {
    input
        .iter()
        .map(|&value| if value > 0.0 { value } else { 0.0 })
        .collect()
}
