use uma_rs::ZeroPoints;
use uma_rs_device_ref::{dense, qnn_dense, qnn_relu, relu, DenseDims, DeviceError};

#[test]
fn qnn_dense_subtracts_zero_points() {
    let out = qnn_dense(
        &[5, 5],
        &[3, 3],
        &[0],
        DenseDims::new(1, 2, 1),
        ZeroPoints::new(1, 1),
    )
    .expect("dense");
    assert_eq!(out, vec![16]);
}

#[test]
fn qnn_dense_handles_multiple_rows() {
    // input 2x3, weight 2x3, output 2x2
    let input = [1i8, 2, 3, -1, -2, -3];
    let weight = [1i8, 0, -1, 2, 2, 2];
    let bias = [100i32, 0, 0, -100];
    let out = qnn_dense(
        &input,
        &weight,
        &bias,
        DenseDims::new(2, 3, 2),
        ZeroPoints::default(),
    )
    .expect("dense");
    assert_eq!(out, vec![98, 12, 2, -112]);
}

#[test]
fn qnn_dense_rejects_wrong_weight_shape() {
    let err = qnn_dense(
        &[1, 2],
        &[1, 2, 3],
        &[0],
        DenseDims::new(1, 2, 1),
        ZeroPoints::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DeviceError::ShapeMismatch {
            operand: "weight",
            expected: 2,
            found: 3
        }
    ));
}

#[test]
fn qnn_relu_clamps_to_int8() {
    assert_eq!(qnn_relu(&[-130, 200, 50]), vec![-128, 127, 50]);
    assert_eq!(qnn_relu(&[i32::MIN, -128, 127, i32::MAX]), vec![-128, -128, 127, 127]);
}

#[test]
fn float_dense_matches_quantized_without_offsets() {
    let dims = DenseDims::new(1, 2, 1);
    let quantized = qnn_dense(&[4, 4], &[2, 2], &[0], dims, ZeroPoints::default()).expect("dense");
    let float = dense(&[4.0, 4.0], &[2.0, 2.0], dims).expect("dense");
    assert_eq!(quantized, vec![16]);
    assert_eq!(float, vec![16.0]);
}

#[test]
fn float_relu_keeps_positive_values() {
    assert_eq!(relu(&[-130.0, 200.0, 50.0]), vec![0.0, 200.0, 50.0]);
}

#[test]
fn float_relu_agrees_with_quantized_in_range() {
    let values = [-5i32, 0, 7, 100];
    let clamped = qnn_relu(&values);
    let floats: Vec<f32> = values.iter().map(|v| *v as f32).collect();
    let rectified = relu(&floats);
    for ((q, f), v) in clamped.iter().zip(&rectified).zip(&values) {
        if *v >= 0 {
            assert_eq!(*q as f32, *f);
        } else {
            assert_eq!(*f, 0.0);
        }
    }
}

#[test]
fn float_dense_rejects_wrong_input_shape() {
    let err = dense(&[1.0], &[1.0, 1.0], DenseDims::new(1, 2, 1)).unwrap_err();
    assert!(matches!(err, DeviceError::ShapeMismatch { operand: "input", .. }));
}
