use glam::{Quat, Vec4};

pub use crate::asset::animation::{ChannelPath, Interpolation};

fn quat_from(value: Vec4) -> Quat {
    Quat::from_xyzw(value.x, value.y, value.z, value.w)
}

enum Sample {
    /// Before the first keyframe, or a single-keyframe curve.
    Clamped(Vec4),
    Interval {
        index: usize,
        progress: f32,
        duration: f32,
    },
}

/// Keyframe curve with a fixed interpolation kind. Inputs are assumed
/// strictly increasing and length-matched to the outputs; that is
/// validated at load, not here.
#[derive(Debug, Clone)]
pub struct AnimationSampler {
    pub interpolation: Interpolation,
    pub inputs: Vec<f32>,
    pub outputs: Vec<Vec4>,
}

impl AnimationSampler {
    /// Value stored at a keyframe; cubic-spline curves keep in-tangent,
    /// value and out-tangent triples, so the value sits in the middle.
    fn keyframe_value(&self, index: usize) -> Vec4 {
        match self.interpolation {
            Interpolation::CubicSpline => self.outputs[index * 3 + 1],
            _ => self.outputs[index],
        }
    }

    /// Find the keyframe interval containing `time` by linear scan; curve
    /// sizes are small enough that a binary search would not pay off.
    fn locate(&self, time: f32) -> Option<Sample> {
        if self.inputs.is_empty() {
            return None;
        }
        if self.inputs.len() == 1 || time <= self.inputs[0] {
            return Some(Sample::Clamped(self.keyframe_value(0)));
        }
        for index in 0..self.inputs.len() - 1 {
            let start = self.inputs[index];
            let end = self.inputs[index + 1];
            if time >= start && time <= end {
                let duration = end - start;
                let progress = if duration > 0.0 {
                    (time - start) / duration
                } else {
                    0.0
                };
                return Some(Sample::Interval {
                    index,
                    progress,
                    duration,
                });
            }
        }
        // past the last keyframe; the caller wraps or clamps time
        None
    }

    fn hermite(&self, index: usize, progress: f32, duration: f32) -> Vec4 {
        let value = self.outputs[index * 3 + 1];
        let out_tangent = self.outputs[index * 3 + 2] * duration;
        let next_in_tangent = self.outputs[(index + 1) * 3] * duration;
        let next_value = self.outputs[(index + 1) * 3 + 1];
        let t = progress;
        let t2 = t * t;
        let t3 = t2 * t;
        value * (2.0 * t3 - 3.0 * t2 + 1.0)
            + out_tangent * (t3 - 2.0 * t2 + t)
            + next_value * (-2.0 * t3 + 3.0 * t2)
            + next_in_tangent * (t3 - t2)
    }

    /// Sample the curve for a vector path. Returns `None` when `time` is
    /// past the last keyframe or the curve is empty.
    pub fn sample(&self, time: f32) -> Option<Vec4> {
        let value = match self.locate(time)? {
            Sample::Clamped(value) => value,
            Sample::Interval {
                index,
                progress,
                duration,
            } => match self.interpolation {
                Interpolation::Step => self.outputs[index],
                Interpolation::Linear => self.outputs[index].lerp(self.outputs[index + 1], progress),
                Interpolation::CubicSpline => self.hermite(index, progress, duration),
            },
        };
        Some(value)
    }

    /// Sample the curve for the rotation path. Endpoints are combined with
    /// spherical interpolation along the shorter arc; a component-wise lerp
    /// would visibly distort rotation blending.
    pub fn sample_rotation(&self, time: f32) -> Option<Quat> {
        let rotation = match self.locate(time)? {
            Sample::Clamped(value) => quat_from(value),
            Sample::Interval {
                index,
                progress,
                duration,
            } => match self.interpolation {
                Interpolation::Step => quat_from(self.outputs[index]),
                Interpolation::Linear => quat_from(self.outputs[index])
                    .slerp(quat_from(self.outputs[index + 1]), progress),
                Interpolation::CubicSpline => quat_from(self.hermite(index, progress, duration)),
            },
        };
        Some(rotation.normalize())
    }

    /// Earliest and latest keyframe times.
    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((*self.inputs.first()?, *self.inputs.last()?))
    }
}

/// Binds one sampler's output to one transform component of one node.
#[derive(Debug, Clone)]
pub struct AnimationChannel {
    pub path: ChannelPath,
    pub node: usize,
    pub sampler: usize,
}

/// Named, independently playable animation with a time range derived from
/// its samplers' inputs.
#[derive(Debug, Clone)]
pub struct Animation {
    pub name: String,
    pub samplers: Vec<AnimationSampler>,
    pub channels: Vec<AnimationChannel>,
    pub start: f32,
    pub end: f32,
}

#[cfg(test)]
mod test {
    use glam::{Quat, Vec4};

    use super::{AnimationSampler, Interpolation};

    fn linear_sampler() -> AnimationSampler {
        AnimationSampler {
            interpolation: Interpolation::Linear,
            inputs: vec![0.0, 1.0, 2.0],
            outputs: vec![
                Vec4::new(0.0, 0.0, 0.0, 0.0),
                Vec4::new(10.0, 0.0, 0.0, 0.0),
                Vec4::new(10.0, 20.0, 0.0, 0.0),
            ],
        }
    }

    #[test]
    fn linear_hits_keyframes_exactly() {
        let sampler = linear_sampler();
        assert_eq!(sampler.sample(0.0), Some(Vec4::new(0.0, 0.0, 0.0, 0.0)));
        assert_eq!(sampler.sample(1.0), Some(Vec4::new(10.0, 0.0, 0.0, 0.0)));
        assert_eq!(sampler.sample(2.0), Some(Vec4::new(10.0, 20.0, 0.0, 0.0)));
    }

    #[test]
    fn linear_interpolates_within_interval() {
        let sampler = linear_sampler();
        assert_eq!(sampler.sample(0.5), Some(Vec4::new(5.0, 0.0, 0.0, 0.0)));
        assert_eq!(sampler.sample(1.5), Some(Vec4::new(10.0, 10.0, 0.0, 0.0)));
    }

    #[test]
    fn before_first_keyframe_clamps_to_first() {
        let sampler = linear_sampler();
        assert_eq!(sampler.sample(-1.0), Some(Vec4::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn past_last_keyframe_yields_nothing() {
        let sampler = linear_sampler();
        assert_eq!(sampler.sample(3.0), None);
    }

    #[test]
    fn single_keyframe_clamps_everywhere() {
        let sampler = AnimationSampler {
            interpolation: Interpolation::Linear,
            inputs: vec![0.5],
            outputs: vec![Vec4::new(7.0, 0.0, 0.0, 0.0)],
        };
        assert_eq!(sampler.sample(0.0), Some(Vec4::new(7.0, 0.0, 0.0, 0.0)));
        assert_eq!(sampler.sample(0.5), Some(Vec4::new(7.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn step_holds_lower_keyframe() {
        let sampler = AnimationSampler {
            interpolation: Interpolation::Step,
            ..linear_sampler()
        };
        assert_eq!(sampler.sample(0.9), Some(Vec4::new(0.0, 0.0, 0.0, 0.0)));
        assert_eq!(sampler.sample(1.1), Some(Vec4::new(10.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn slerp_midpoint_of_orthogonal_rotations() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let sampler = AnimationSampler {
            interpolation: Interpolation::Linear,
            inputs: vec![0.0, 1.0],
            outputs: vec![
                Vec4::new(a.x, a.y, a.z, a.w),
                Vec4::new(b.x, b.y, b.z, b.w),
            ],
        };
        let mid = sampler.sample_rotation(0.5).unwrap();
        assert!((mid.length() - 1.0).abs() < 1e-5);
        let quarter = std::f32::consts::FRAC_PI_4;
        assert!((mid.angle_between(a) - quarter).abs() < 1e-5);
        assert!((mid.angle_between(b) - quarter).abs() < 1e-5);
    }

    #[test]
    fn cubic_spline_with_zero_tangents_blends_smoothly() {
        // in-tangent, value, out-tangent per keyframe
        let sampler = AnimationSampler {
            interpolation: Interpolation::CubicSpline,
            inputs: vec![0.0, 1.0],
            outputs: vec![
                Vec4::ZERO,
                Vec4::new(0.0, 0.0, 0.0, 0.0),
                Vec4::ZERO,
                Vec4::ZERO,
                Vec4::new(1.0, 0.0, 0.0, 0.0),
                Vec4::ZERO,
            ],
        };
        assert_eq!(sampler.sample(0.0), Some(Vec4::new(0.0, 0.0, 0.0, 0.0)));
        assert_eq!(sampler.sample(1.0), Some(Vec4::new(1.0, 0.0, 0.0, 0.0)));
        // Hermite basis at the midpoint with zero tangents averages the values
        assert_eq!(sampler.sample(0.5), Some(Vec4::new(0.5, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn time_range_spans_inputs() {
        assert_eq!(linear_sampler().time_range(), Some((0.0, 2.0)));
    }
}
