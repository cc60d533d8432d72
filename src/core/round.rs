pub fn to2(value: f64) -> f64 {
    round_to(value, 100.0)
}

pub fn to4(value: f64) -> f64 {
    round_to(value, 10_000.0)
}

// Half-up after an epsilon nudge; negative halves round toward +inf.
fn round_to(value: f64, scale: f64) -> f64 {
    ((value + f64::EPSILON) * scale + 0.5).floor() / scale
}
