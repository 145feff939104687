//! Math utility functions.

use euclid::default::{Transform3D, Vector3D};
use num_traits::Float;

use crate::color::{Component, Components};

/// A 3x3 color transform, stored in a 4x4 matrix.
pub type Transform = Transform3D<Component>;

type Vector = Vector3D<Component>;

/// Build a 3x3 matrix. The arguments are given column by column, the way
/// euclid multiplies row vectors.
#[allow(clippy::too_many_arguments)]
pub const fn transform_3x3(
    m11: Component,
    m12: Component,
    m13: Component,
    m21: Component,
    m22: Component,
    m23: Component,
    m31: Component,
    m32: Component,
    m33: Component,
) -> Transform {
    Transform::new(
        m11, m12, m13, 0.0, //
        m21, m22, m23, 0.0, //
        m31, m32, m33, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Multiply the given matrix in `transform` with the 3 components.
pub fn transform(transform: &Transform, components: Components) -> Components {
    let Vector { x, y, z, .. } =
        transform.transform_vector3d(Vector::new(components.0, components.1, components.2));
    Components(x, y, z)
}

/// True when the value is close enough to zero to be treated as zero.
pub fn almost_zero(value: Component) -> bool {
    value.abs() < Component::EPSILON * 16.0
}

/// Wrap a hue in degrees into `[0, 360)`.
pub fn normalize_hue(hue: Component) -> Component {
    hue.rem_euclid(360.0)
}

/// Map `value` from the range `[from_start, from_end]` onto
/// `[to_start, to_end]`.
pub fn remap<T: Float>(from_start: T, from_end: T, to_start: T, to_end: T, value: T) -> T {
    let t = (value - from_start) / (from_end - from_start);
    to_start + t * (to_end - to_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn identity() {
        let m = transform_3x3(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            transform(&m, Components(0.1, 0.2, 0.3)),
            Components(0.1, 0.2, 0.3)
        );
    }

    #[test]
    fn columns_feed_each_output() {
        // x' = 2x + y, y' = z, z' = x
        let m = transform_3x3(2.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let Components(x, y, z) = transform(&m, Components(1.0, 2.0, 3.0));
        assert_component_eq!(x, 4.0);
        assert_component_eq!(y, 3.0);
        assert_component_eq!(z, 1.0);
    }

    #[test]
    fn hues_wrap() {
        assert_component_eq!(normalize_hue(-30.0), 330.0);
        assert_component_eq!(normalize_hue(720.0), 0.0);
        assert_component_eq!(remap(0.0, 35.0, 0.0, 60.0, 17.5), 30.0);
    }
}
