/// Red ramp over height: `z - baseline` clamped to `[0, 1]` drives the red
/// channel, green and blue stay at zero. Channels are 16-bit as in LAS.
pub fn height_ramp(z: f64, baseline: f64) -> [u16; 3] {
    let t = (z - baseline).clamp(0.0, 1.0);
    let red = if t.is_nan() { 0 } else { (t * 65535.0).round() as u16 };
    [red, 0, 0]
}
