use std::f64::consts::TAU;

use crate::random::RandomSource;

/// Throws a dart into the annulus `[radius, 2 * radius)` around `seed`.
///
/// The candidate is uniformly distributed over the area (volume) of the annulus, not just
/// over its radial extent. The result is not clipped to any domain.
pub fn throw<const D: usize, R: RandomSource>(seed: &[f64; D], radius: f64, rng: &mut R) -> [f64; D] {
    let direction = unit_direction::<D, R>(rng);
    let magnitude = annulus_magnitude::<D, R>(radius, rng);
    std::array::from_fn(|i| seed[i] + direction[i] * magnitude)
}

/// A direction drawn uniformly from the unit sphere in `D` dimensions.
pub fn unit_direction<const D: usize, R: RandomSource>(rng: &mut R) -> [f64; D] {
    let mut direction = [0.0; D];
    match D {
        0 => {}
        1 => direction[0] = if rng.next_float() < 0.5 { -1.0 } else { 1.0 },
        2 => {
            let angle = TAU * rng.next_float();
            direction[0] = angle.cos();
            direction[1] = angle.sin();
        }
        _ => loop {
            let mut i = 0;
            while i < D {
                let (a, b) = standard_normal_pair(rng);
                direction[i] = a;
                if i + 1 < D {
                    direction[i + 1] = b;
                }
                i += 2;
            }
            let norm = direction.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > f64::EPSILON {
                direction.iter_mut().for_each(|v| *v /= norm);
                break;
            }
        },
    }
    direction
}

/// A distance in `[radius, 2 * radius)` whose density grows with `r^(D-1)`.
///
/// Inverting the CDF of the shell volume gives `r = radius * (1 + u)^(1/D)`.
pub fn annulus_magnitude<const D: usize, R: RandomSource>(radius: f64, rng: &mut R) -> f64 {
    let u = rng.next_float();
    match D {
        1 => radius * (1.0 + u),
        2 => radius * (1.0 + u).sqrt(),
        _ => radius * (1.0 + u).powf(1.0 / D as f64),
    }
}

/// Two independent standard normal values (Box-Muller).
fn standard_normal_pair<R: RandomSource>(rng: &mut R) -> (f64, f64) {
    // 1 - u lies in (0, 1], keeping the logarithm finite.
    let u0 = 1.0 - rng.next_float();
    let u1 = rng.next_float();
    let r = (-2.0 * u0.ln()).sqrt();
    let theta = TAU * u1;
    (r * theta.sin(), r * theta.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use crate::sample::distance_sq;

    fn assert_in_annulus<const D: usize>(count: usize) {
        let mut rng = seeded(11);
        let seed = [5.0; D];
        let radius = 2.0;
        for _ in 0..count {
            let p = throw(&seed, radius, &mut rng);
            let d = distance_sq(&seed, &p).sqrt();
            assert!(d >= radius - 1e-9 && d < 2.0 * radius + 1e-9, "distance {} in {}D", d, D);
        }
    }

    #[test]
    fn test_candidates_land_in_annulus() {
        assert_in_annulus::<1>(500);
        assert_in_annulus::<2>(500);
        assert_in_annulus::<3>(500);
        assert_in_annulus::<5>(500);
    }

    #[test]
    fn test_directions_are_unit_length() {
        let mut rng = seeded(2);
        for _ in 0..200 {
            let d: [f64; 4] = unit_direction(&mut rng);
            let norm = d.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_magnitude_is_area_uniform_in_2d() {
        // Half of the annulus area lies below sqrt(2.5) * r, so about half of the darts should too.
        let mut rng = seeded(5);
        let split = 2.5f64.sqrt();
        let n = 20_000;
        let inner = (0..n)
            .filter(|_| annulus_magnitude::<2, _>(1.0, &mut rng) < split)
            .count();
        let fraction = inner as f64 / n as f64;
        assert!((fraction - 0.5).abs() < 0.02, "inner fraction {}", fraction);
    }

    #[test]
    fn test_directions_are_not_biased() {
        let mut rng = seeded(9);
        let n = 20_000;
        let mut mean = [0.0; 3];
        for _ in 0..n {
            let d: [f64; 3] = unit_direction(&mut rng);
            for i in 0..3 {
                mean[i] += d[i] / n as f64;
            }
        }
        for m in mean {
            assert!(m.abs() < 0.03, "mean component {}", m);
        }
    }
}
