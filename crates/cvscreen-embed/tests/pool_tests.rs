use candle_core::{DType, Device, Tensor};
use cvscreen_embed::{l2_normalize, masked_mean};

#[test]
fn masked_mean_skips_padding() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is padding.
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0,  // token 0
                                 5.0, 6.0, 7.0, 8.0],    // token 1
                               (1, 2, 4), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 0u32], (1, 2), &dev).unwrap();
    let out: Vec<Vec<f32>> = masked_mean(&h, &mask).unwrap().to_vec2().unwrap();
    assert_eq!(out[0], vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn full_mask_is_plain_mean_over_all_tokens() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 5.0, 6.0, 7.0], (1, 3, 2), &dev).unwrap();
    let mask = Tensor::ones((1, 3), DType::U32, &dev).unwrap();
    let out: Vec<Vec<f32>> = masked_mean(&h, &mask).unwrap().to_vec2().unwrap();
    let expected = [(1.0 + 3.0 + 6.0) / 3.0, (2.0 + 5.0 + 7.0) / 3.0];
    for (a, b) in out[0].iter().zip(expected) {
        assert!((a - b).abs() < 1e-6, "a={} b={}", a, b);
    }
}

#[test]
fn padded_batch_rows_match_unpadded() {
    let dev = Device::Cpu;
    // row 0 has one real token and one pad; row 1 has two real tokens
    let h = Tensor::from_slice(&[2.0f32, 4.0, 9.0, 9.0,
                                 1.0, 1.0, 3.0, 3.0], (2, 2, 2), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 0, 1, 1], (2, 2), &dev).unwrap();
    let out: Vec<Vec<f32>> = masked_mean(&h, &mask).unwrap().to_vec2().unwrap();
    assert_eq!(out[0], vec![2.0, 4.0]);
    assert_eq!(out[1], vec![2.0, 2.0]);
}

#[test]
fn l2_normalize_unit_rows_and_keeps_zero() {
    let dev = Device::Cpu;
    let v = Tensor::from_slice(&[3.0f32, 4.0, 0.0, 0.0], (2, 2), &dev).unwrap();
    let out: Vec<Vec<f32>> = l2_normalize(&v).unwrap().to_vec2().unwrap();
    assert!((out[0][0] - 0.6).abs() < 1e-6 && (out[0][1] - 0.8).abs() < 1e-6);
    assert_eq!(out[1], vec![0.0, 0.0]);
}
