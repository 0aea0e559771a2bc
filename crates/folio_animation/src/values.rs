//! Animatable value types
//!
//! [`Interpolate`] for scalar and prop values, plus [`PropPatch`]: a partial
//! set of [`VisualProps`] used as the `from`/`to` of tweens. A tween only
//! ever writes the properties its patches name, so two tweens animating
//! different properties of the same node don't clobber each other.

use folio_core::VisualProps;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    ///
    /// `t` may leave `[0, 1]` for overshooting curves.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        // Exact at both endpoints
        self * (1.0 - t) + other * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for VisualProps {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let mut out = *self;
        for prop in Prop::ALL {
            prop.write(&mut out, prop.read(self).lerp(&prop.read(other), t));
        }
        out
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        VisualProps::approx_eq(self, other, epsilon)
    }
}

/// A single animatable property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    Opacity,
    X,
    Y,
    Scale,
    RotateX,
    RotateY,
    Shadow,
}

impl Prop {
    pub const ALL: [Prop; 7] = [
        Prop::Opacity,
        Prop::X,
        Prop::Y,
        Prop::Scale,
        Prop::RotateX,
        Prop::RotateY,
        Prop::Shadow,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn read(self, props: &VisualProps) -> f32 {
        match self {
            Prop::Opacity => props.opacity,
            Prop::X => props.x,
            Prop::Y => props.y,
            Prop::Scale => props.scale,
            Prop::RotateX => props.rotate_x,
            Prop::RotateY => props.rotate_y,
            Prop::Shadow => props.shadow,
        }
    }

    pub fn write(self, props: &mut VisualProps, value: f32) {
        match self {
            Prop::Opacity => props.opacity = value,
            Prop::X => props.x = value,
            Prop::Y => props.y = value,
            Prop::Scale => props.scale = value,
            Prop::RotateX => props.rotate_x = value,
            Prop::RotateY => props.rotate_y = value,
            Prop::Shadow => props.shadow = value,
        }
    }
}

/// A partial set of visual properties
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PropPatch {
    values: [Option<f32>; 7],
}

impl PropPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch naming every property with the values of `props`
    pub fn from_props(props: &VisualProps) -> Self {
        let mut patch = Self::new();
        for prop in Prop::ALL {
            patch.values[prop.index()] = Some(prop.read(props));
        }
        patch
    }

    pub fn with(mut self, prop: Prop, value: f32) -> Self {
        self.values[prop.index()] = Some(value);
        self
    }

    pub fn opacity(self, value: f32) -> Self {
        self.with(Prop::Opacity, value)
    }

    pub fn x(self, value: f32) -> Self {
        self.with(Prop::X, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.with(Prop::Y, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.with(Prop::Scale, value)
    }

    pub fn rotate_x(self, value: f32) -> Self {
        self.with(Prop::RotateX, value)
    }

    pub fn rotate_y(self, value: f32) -> Self {
        self.with(Prop::RotateY, value)
    }

    pub fn shadow(self, value: f32) -> Self {
        self.with(Prop::Shadow, value)
    }

    pub fn get(&self, prop: Prop) -> Option<f32> {
        self.values[prop.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Properties named by this patch
    pub fn props(&self) -> impl Iterator<Item = Prop> + '_ {
        Prop::ALL.into_iter().filter(|p| self.get(*p).is_some())
    }

    /// Patch naming the properties of either patch; values from `other` win
    pub fn merge(&self, other: &PropPatch) -> PropPatch {
        let mut out = *self;
        for prop in other.props() {
            out.values[prop.index()] = other.get(prop);
        }
        out
    }

    /// `base` with this patch's values written over it
    pub fn apply_to(&self, base: &VisualProps) -> VisualProps {
        let mut out = *base;
        for prop in self.props() {
            if let Some(value) = self.get(prop) {
                prop.write(&mut out, value);
            }
        }
        out
    }

    /// The current values in `props` of every property this patch names
    pub fn capture(&self, props: &VisualProps) -> PropPatch {
        let mut out = PropPatch::new();
        for prop in self.props() {
            out.values[prop.index()] = Some(prop.read(props));
        }
        out
    }

    /// Write `start.lerp(end, t)` into `target` for the properties named here
    pub fn blend_into(&self, target: &mut VisualProps, start: &VisualProps, end: &VisualProps, t: f32) {
        for prop in self.props() {
            prop.write(target, prop.read(start).lerp(&prop.read(end), t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_patch_apply_only_named() {
        let patch = PropPatch::new().opacity(0.0).y(40.0);
        let out = patch.apply_to(&VisualProps::REST);
        assert_eq!(out.opacity, 0.0);
        assert_eq!(out.y, 40.0);
        assert_eq!(out.scale, 1.0);
    }

    #[test]
    fn test_blend_leaves_unnamed_props() {
        let mask = PropPatch::new().scale(1.0);
        let mut target = VisualProps {
            y: -4.0,
            ..VisualProps::REST
        };
        let start = VisualProps::REST;
        let end = VisualProps {
            scale: 2.0,
            y: 100.0,
            ..VisualProps::REST
        };

        mask.blend_into(&mut target, &start, &end, 0.5);
        assert!((target.scale - 1.5).abs() < 1e-6);
        assert_eq!(target.y, -4.0);
    }

    #[test]
    fn test_merge_and_capture() {
        let a = PropPatch::new().opacity(0.0).y(10.0);
        let b = PropPatch::new().y(20.0).scale(0.5);
        let merged = a.merge(&b);
        assert_eq!(merged.get(Prop::Y), Some(20.0));
        assert_eq!(merged.props().count(), 3);

        let captured = merged.capture(&VisualProps::REST);
        assert_eq!(captured.get(Prop::Opacity), Some(1.0));
        assert_eq!(captured.get(Prop::Shadow), None);
    }
}
