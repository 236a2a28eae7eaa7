//! Summing, wet/dry blending and oscillator crossfades.

/*
Linear Crossfade
================

Two signals share one level. `balance` moves that level from A to B:

    weight_a = 1 - balance
    weight_b = balance

The weights always add up to 1, so a crossfade never makes the sum louder
than its loudest input. The same rule serves wet/dry blending (A = dry,
B = wet) and the two-oscillator mix of a voice (A = osc 1, B = osc 2).

Summing (voices into the bus, noise into the bus) has no such guarantee;
the chain clamps at the very end instead.
*/

/// Split `level` between two sources: `(level · (1 - mix), level · mix)`.
#[inline]
pub fn crossfade_gains(mix: f32, level: f32) -> (f32, f32) {
    let mix = mix.clamp(0.0, 1.0);
    (level * (1.0 - mix), level * mix)
}

/// Add `b` into `a`.
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// `wet[i] = dry[i] · (1 - mix) + wet[i] · mix`
#[inline]
pub fn apply_dry_wet(dry: &[f32], wet: &mut [f32], mix: f32) {
    debug_assert_eq!(dry.len(), wet.len());

    if mix >= 1.0 {
        return;
    }

    let dry_amount = 1.0 - mix;
    for (wet_sample, &dry_sample) in wet.iter_mut().zip(dry.iter()) {
        *wet_sample = dry_sample * dry_amount + *wet_sample * mix;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossfade_conserves_level() {
        for mix in [0.0, 0.1, 0.5, 0.93, 1.0] {
            let (g1, g2) = crossfade_gains(mix, 0.8);
            assert!((g1 + g2 - 0.8).abs() < 1e-6, "mix {mix}");
        }
    }

    #[test]
    fn crossfade_clamps_mix() {
        assert_eq!(crossfade_gains(2.0, 1.0), (0.0, 1.0));
        assert_eq!(crossfade_gains(-1.0, 1.0), (1.0, 0.0));
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend_dry_wet(1.0, 0.5, 0.0), 1.0);
        assert_eq!(blend_dry_wet(1.0, 0.5, 1.0), 0.5);
        assert_eq!(blend_dry_wet(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn apply_dry_wet_half() {
        let dry = [1.0, 1.0, 1.0, 1.0];
        let mut wet = [0.0, 0.0, 0.0, 0.0];
        apply_dry_wet(&dry, &mut wet, 0.5);
        assert_eq!(wet, [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn sum_can_exceed_full_scale() {
        let mut a = [1.0, 0.5];
        sum_in_place(&mut a, &[1.0, 0.8]);
        assert_eq!(a, [2.0, 1.3]);
    }
}
