pub mod entrance;
pub mod parallax;
pub mod particles;
pub mod typewriter;

/// Quadratic ease-in-out on 0..=1.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
