use rapier2d::prelude::*;

use crate::physics::{GROUP_BALL, GROUP_PARTICLE, GROUP_WALL};

pub const PARTICLE_DENSITY: Real = 1.0;
pub const PARTICLE_LINEAR_DAMPING: Real = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct ParticleSystemDef {
    /// Particle radius in meters.
    pub radius: Real,
}

/// Axis-aligned spawn region of a particle group.
#[derive(Debug, Clone, Copy)]
pub struct EmissionRect {
    pub center: Point<Real>,
    pub half_extents: Vector<Real>,
}

impl EmissionRect {
    /// Lattice points inside the rectangle, `stride` apart.
    fn lattice(&self, stride: Real) -> Vec<Point<Real>> {
        let per_axis = |half: Real| -> usize {
            if half <= 0.0 || stride <= 0.0 {
                0
            } else {
                (2.0 * half / stride + 1.0e-4).floor() as usize
            }
        };
        let columns = per_axis(self.half_extents.x);
        let rows = per_axis(self.half_extents.y);
        let lower = self.center - self.half_extents;

        let mut points = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                points.push(point![
                    lower.x + stride * (column as Real + 0.5),
                    lower.y + stride * (row as Real + 0.5)
                ]);
            }
        }
        points
    }
}

/// A field of small free balls, read back as a flat `[x0, y0, x1, y1, ...]` buffer.
#[derive(Debug)]
pub struct ParticleSystem {
    def: ParticleSystemDef,
    handles: Vec<RigidBodyHandle>,
    positions: Vec<Real>,
}

impl ParticleSystem {
    pub fn new(def: ParticleSystemDef) -> Self {
        Self {
            def,
            handles: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Fill `rect` with particles one diameter apart. Returns how many were created.
    pub fn create_group(
        &mut self,
        rect: &EmissionRect,
        rigid_body_set: &mut RigidBodySet,
        collider_set: &mut ColliderSet,
    ) -> usize {
        let radius = self.def.radius;
        // One diameter apart so the rigid balls start without overlap.
        let spawned = rect.lattice(2.0 * radius);

        for position in &spawned {
            let body = RigidBodyBuilder::dynamic()
                .translation(position.coords)
                .lock_rotations()
                .linear_damping(PARTICLE_LINEAR_DAMPING)
                .build();
            let handle = rigid_body_set.insert(body);
            let collider = ColliderBuilder::ball(radius)
                .density(PARTICLE_DENSITY)
                .friction(0.0)
                .restitution(0.0)
                .collision_groups(InteractionGroups::new(
                    Group::from_bits_truncate(GROUP_PARTICLE),
                    Group::from_bits_truncate(GROUP_WALL | GROUP_BALL | GROUP_PARTICLE),
                ))
                .build();
            collider_set.insert_with_parent(collider, handle, rigid_body_set);

            self.handles.push(handle);
            self.positions.extend_from_slice(&[position.x, position.y]);
        }
        spawned.len()
    }

    /// Refresh the position buffer after a simulation step.
    pub fn sync_positions(&mut self, rigid_body_set: &RigidBodySet) {
        for (idx, handle) in self.handles.iter().enumerate() {
            if let Some(body) = rigid_body_set.get(*handle) {
                let t = body.translation();
                self.positions[idx * 2] = t.x;
                self.positions[idx * 2 + 1] = t.y;
            }
        }
    }

    pub fn position_buffer(&self) -> &[Real] {
        &self.positions
    }

    pub fn particle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn radius(&self) -> Real {
        self.def.radius
    }

    pub fn handles(&self) -> &[RigidBodyHandle] {
        &self.handles
    }
}
