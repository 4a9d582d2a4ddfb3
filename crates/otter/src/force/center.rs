use super::{Body, Vec2};

/// Translates the whole node set so its mean position moves toward `(x, y)`.
///
/// Acts on positions, not velocities, so it removes drift without adding energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterForce {
    pub x: f64,
    pub y: f64,
    pub strength: f64,
}

impl Default for CenterForce {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl CenterForce {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            strength: 1.0,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub(crate) fn apply(&self, bodies: &mut [Body]) {
        if bodies.is_empty() {
            return;
        }
        let mut sum = Vec2::zeros();
        for b in bodies.iter() {
            sum += b.pos;
        }
        let mean = sum / bodies.len() as f64;
        let shift = (mean - Vec2::new(self.x, self.y)) * self.strength;
        for b in bodies.iter_mut() {
            b.pos -= shift;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Body, CenterForce, Vec2};

    fn body(x: f64, y: f64) -> Body {
        Body {
            pos: Vec2::new(x, y),
            vel: Vec2::zeros(),
            pin: None,
            anchor: None,
        }
    }

    #[test]
    fn moves_the_centroid_onto_the_target() {
        let mut bodies = vec![body(10.0, 10.0), body(30.0, 50.0)];
        CenterForce::new(0.0, 0.0).apply(&mut bodies);
        let mean = (bodies[0].pos + bodies[1].pos) / 2.0;
        assert!(mean.norm() < 1e-12, "centroid: {mean:?}");
        // relative layout is untouched
        assert_eq!(bodies[1].pos - bodies[0].pos, Vec2::new(20.0, 40.0));
    }

    #[test]
    fn partial_strength_moves_part_of_the_way() {
        let mut bodies = vec![body(10.0, 0.0)];
        CenterForce::new(0.0, 0.0)
            .with_strength(0.5)
            .apply(&mut bodies);
        assert_eq!(bodies[0].pos, Vec2::new(5.0, 0.0));
    }
}
