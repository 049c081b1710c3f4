use crate::geometry::{FloatType, Ray, WorldBox, gamma};

pub trait RayIntersectionExt {
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType);

    /// Checks whether the ray passes through the box somewhere within [t_min, t_max].
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> bool {
        let (t1, t2) = self.intersect(ray);
        t1.max(t_min) <= t2.min(t_max)
    }
}

impl RayIntersectionExt for WorldBox {
    /// Calculates ray intersection with the box.
    /// Returns minimum and maximum distance along the ray, ray intersects is min <= max.
    /// The maximum is rounded outwards, so that hits on the surface of shapes touching the
    /// box are never culled by rounding.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        // Componentwise distances along the ray to the box's min and max corners
        // The multiplication is NAN if the ray is starting inside the slab bounding plane
        // and is parallel to it. In this case we blend to +-infinity, so that the range becomes infinite
        let to_box_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (min_t <= max_t)
        let componentwise_min_t = to_box_min.zip_map(&to_box_max, FloatType::min);
        let componentwise_max_t = to_box_min.zip_map(&to_box_max, FloatType::max);

        let min_t = componentwise_min_t.max();
        let max_t = componentwise_max_t.min();
        let max_t = if max_t.is_finite() {
            max_t + max_t.abs() * 2.0 * gamma(3)
        } else {
            max_t
        };

        (min_t, max_t)
    }
}
