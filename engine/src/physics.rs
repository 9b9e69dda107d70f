//! Minimal 2D physics collaborator.
//!
//! Axis-aligned boxes only. Dynamic bodies fall under gravity and are pushed
//! out of solid bodies along the axis of least penetration. Sensor bodies
//! never push anything; instead the world reports a contact the first frame
//! a dynamic body starts overlapping one. Bodies carry a caller-defined tag
//! so the game can classify contacts without looking anything up.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;

pub const DEFAULT_GRAVITY: f32 = 1400.0; // units/sec^2

/// Longest slice of time integrated at once. Longer frames are split so a
/// stalled frame cannot carry a body through a solid.
pub const MAX_SUBSTEP: f32 = 1.0 / 60.0;

// Frame time beyond this many substeps is dropped.
const MAX_SUBSTEPS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Immovable, blocks dynamic bodies.
    Solid,
    /// Immovable (unless patrolling), reports contacts, blocks nothing.
    Sensor,
    /// Moved by gravity, velocity and impulses.
    Dynamic,
}

/// Horizontal back-and-forth motion: `distance` to the right over
/// `leg_seconds`, then back over the same time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    pub distance: f32,
    pub leg_seconds: f32,
}

impl Patrol {
    /// Offset from the patrol origin at time `t`.
    pub fn offset(&self, t: f32) -> f32 {
        if self.leg_seconds <= 0.0 {
            return 0.0;
        }
        let phase = t.rem_euclid(self.leg_seconds * 2.0) / self.leg_seconds;
        if phase <= 1.0 {
            self.distance * phase
        } else {
            self.distance * (2.0 - phase)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Body<T> {
    pub id: BodyId,
    pub tag: T,
    pub kind: BodyKind,
    /// Center of the box.
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    origin: Vec2,
    patrol: Option<Patrol>,
}

impl<T> Body<T> {
    fn half(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Penetration depth per axis; both positive means the boxes overlap.
    fn penetration(&self, other: &Body<T>) -> Vec2 {
        let d = (self.position - other.position).abs();
        self.half() + other.half() - d
    }

    pub fn overlaps(&self, other: &Body<T>) -> bool {
        let pen = self.penetration(other);
        pen.x > 0.0 && pen.y > 0.0
    }
}

/// A contact-begin event. `a` is always the dynamic body.
#[derive(Debug, Clone, Copy)]
pub struct Contact<T> {
    pub a: Body<T>,
    pub b: Body<T>,
}

pub struct PhysicsWorld<T> {
    bodies: BTreeMap<BodyId, Body<T>>,
    next_id: u32,
    gravity: f32,
    time: f32,
    touching: HashSet<(BodyId, BodyId)>,
}

impl<T: Copy> PhysicsWorld<T> {
    pub fn new(gravity: f32) -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_id: 0,
            gravity,
            time: 0.0,
            touching: HashSet::new(),
        }
    }

    fn insert(&mut self, tag: T, kind: BodyKind, position: Vec2, size: Vec2) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            id,
            Body {
                id,
                tag,
                kind,
                position,
                size,
                velocity: Vec2::ZERO,
                origin: position,
                patrol: None,
            },
        );
        id
    }

    pub fn add_solid(&mut self, tag: T, position: Vec2, size: Vec2) -> BodyId {
        self.insert(tag, BodyKind::Solid, position, size)
    }

    pub fn add_sensor(&mut self, tag: T, position: Vec2, size: Vec2) -> BodyId {
        self.insert(tag, BodyKind::Sensor, position, size)
    }

    pub fn add_dynamic(&mut self, tag: T, position: Vec2, size: Vec2) -> BodyId {
        self.insert(tag, BodyKind::Dynamic, position, size)
    }

    /// Attach a patrol to a non-dynamic body. Returns false if the body is
    /// unknown or dynamic.
    pub fn set_patrol(&mut self, id: BodyId, patrol: Patrol) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) if body.kind != BodyKind::Dynamic => {
                body.patrol = Some(patrol);
                true
            }
            _ => false,
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&Body<T>> {
        self.bodies.get(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body<T>> {
        self.bodies.values()
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body<T>> {
        self.touching.retain(|(a, b)| *a != id && *b != id);
        self.bodies.remove(&id)
    }

    pub fn set_velocity_x(&mut self, id: BodyId, vx: f32) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.velocity.x = vx;
        }
    }

    /// Instantaneous change of momentum. Bodies have unit mass, so this is
    /// added straight onto the velocity.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            if body.kind == BodyKind::Dynamic {
                body.velocity += impulse;
            }
        }
    }

    /// Advance the world by `dt` seconds and return the contacts that began
    /// during this step. `dt` is integrated in slices of at most
    /// [`MAX_SUBSTEP`].
    pub fn step(&mut self, dt: f32) -> Vec<Contact<T>> {
        let max_dt = MAX_SUBSTEP * MAX_SUBSTEPS as f32;
        if dt > max_dt {
            log::debug!("physics step of {dt:.3}s truncated to {max_dt:.3}s");
        }
        let dt = dt.max(0.0).min(max_dt);
        let substeps = ((dt / MAX_SUBSTEP).ceil() as u32).max(1);
        let h = dt / substeps as f32;

        let mut began = Vec::new();
        let mut reported = HashSet::new();
        for _ in 0..substeps {
            self.integrate(h);
            for contact in self.collect_contacts() {
                // One report per pair per frame, even if it flickered
                if reported.insert((contact.a.id, contact.b.id)) {
                    began.push(contact);
                }
            }
        }
        began
    }

    fn integrate(&mut self, dt: f32) {
        self.time += dt;
        self.move_patrols(dt);

        let solids: Vec<Body<T>> = self
            .bodies
            .values()
            .filter(|b| b.kind == BodyKind::Solid)
            .copied()
            .collect();

        for body in self.bodies.values_mut() {
            if body.kind != BodyKind::Dynamic {
                continue;
            }
            body.velocity.y -= self.gravity * dt;
            body.position += body.velocity * dt;
            for solid in &solids {
                resolve_against(body, solid);
            }
        }
    }

    fn move_patrols(&mut self, dt: f32) {
        let time = self.time;
        for body in self.bodies.values_mut() {
            if let Some(patrol) = body.patrol {
                let x = body.origin.x + patrol.offset(time);
                if dt > 0.0 {
                    body.velocity.x = (x - body.position.x) / dt;
                }
                body.position.x = x;
            }
        }
    }

    fn collect_contacts(&mut self) -> Vec<Contact<T>> {
        let mut now = HashSet::new();
        let mut began = Vec::new();

        for dynamic in self.bodies.values().filter(|b| b.kind == BodyKind::Dynamic) {
            for sensor in self.bodies.values().filter(|b| b.kind == BodyKind::Sensor) {
                if !dynamic.overlaps(sensor) {
                    continue;
                }
                let key = (dynamic.id, sensor.id);
                if !self.touching.contains(&key) {
                    log::trace!("contact began: {:?} / {:?}", dynamic.id, sensor.id);
                    began.push(Contact {
                        a: *dynamic,
                        b: *sensor,
                    });
                }
                now.insert(key);
            }
        }

        self.touching = now;
        began
    }
}

impl<T: Copy> Default for PhysicsWorld<T> {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

/// Push `body` out of `solid` along the axis of least penetration.
fn resolve_against<T>(body: &mut Body<T>, solid: &Body<T>) {
    let pen = body.penetration(solid);
    if pen.x <= 0.0 || pen.y <= 0.0 {
        return;
    }
    let body_half = body.half();
    let solid_half = solid.half();

    if pen.y < pen.x {
        if body.position.y > solid.position.y {
            // Landed on top
            body.position.y = solid.position.y + solid_half.y + body_half.y;
            body.velocity.y = 0.0;
        } else {
            body.position.y = solid.position.y - solid_half.y - body_half.y;
            if body.velocity.y > 0.0 {
                body.velocity.y = 0.0;
            }
        }
    } else {
        if body.position.x > solid.position.x {
            body.position.x = solid.position.x + solid_half.x + body_half.x;
        } else {
            body.position.x = solid.position.x - solid_half.x - body_half.x;
        }
        body.velocity.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Tag {
        Hero,
        Floor,
        Coin,
    }

    const DT: f32 = 1.0 / 60.0;

    fn world_with_floor() -> PhysicsWorld<Tag> {
        let mut world = PhysicsWorld::new(DEFAULT_GRAVITY);
        world.add_solid(Tag::Floor, Vec2::new(0.0, 0.0), Vec2::new(1000.0, 40.0));
        world
    }

    #[test]
    fn test_falling_body_lands_on_solid() {
        let mut world = world_with_floor();
        let hero = world.add_dynamic(Tag::Hero, Vec2::new(0.0, 100.0), Vec2::new(32.0, 32.0));

        for _ in 0..120 {
            world.step(DT);
        }

        let body = world.body(hero).unwrap();
        assert!((body.position.y - 36.0).abs() < 1e-3);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_solid_blocks_horizontal_movement() {
        let mut world = world_with_floor();
        world.add_solid(Tag::Floor, Vec2::new(100.0, 70.0), Vec2::new(40.0, 100.0));
        let hero = world.add_dynamic(Tag::Hero, Vec2::new(40.0, 36.0), Vec2::new(32.0, 32.0));

        for _ in 0..60 {
            world.set_velocity_x(hero, 200.0);
            world.step(DT);
        }

        let body = world.body(hero).unwrap();
        assert!(body.position.x <= 100.0 - 20.0 - 16.0 + 1e-3);
    }

    #[test]
    fn test_contact_begins_once_per_overlap() {
        let mut world = world_with_floor();
        let hero = world.add_dynamic(Tag::Hero, Vec2::new(0.0, 36.0), Vec2::new(32.0, 32.0));
        let coin = world.add_sensor(Tag::Coin, Vec2::new(0.0, 40.0), Vec2::new(24.0, 42.0));

        let first = world.step(DT);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].a.id, hero);
        assert_eq!(first[0].b.id, coin);
        assert_eq!(first[0].b.tag, Tag::Coin);

        // Still overlapping, no new contact
        assert!(world.step(DT).is_empty());

        // Leave and come back
        world.set_velocity_x(hero, 6000.0);
        world.step(DT);
        world.set_velocity_x(hero, -6000.0);
        let again = world.step(DT);
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_removed_sensor_reports_nothing() {
        let mut world = world_with_floor();
        world.add_dynamic(Tag::Hero, Vec2::new(0.0, 36.0), Vec2::new(32.0, 32.0));
        let coin = world.add_sensor(Tag::Coin, Vec2::new(0.0, 40.0), Vec2::new(24.0, 42.0));

        assert!(world.remove(coin).is_some());
        assert!(world.step(DT).is_empty());
        assert!(world.body(coin).is_none());
    }

    #[test]
    fn test_impulse_changes_velocity() {
        let mut world = world_with_floor();
        let hero = world.add_dynamic(Tag::Hero, Vec2::new(0.0, 36.0), Vec2::new(32.0, 32.0));
        world.apply_impulse(hero, Vec2::new(0.0, 600.0));
        assert_eq!(world.body(hero).unwrap().velocity.y, 600.0);

        // Solids ignore impulses
        let floor = BodyId(0);
        world.apply_impulse(floor, Vec2::new(0.0, 600.0));
        assert_eq!(world.body(floor).unwrap().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_long_frame_keeps_resting_body_on_ground() {
        let mut world = PhysicsWorld::new(DEFAULT_GRAVITY);
        let street = Vec2::new(2600.0, 60.0);
        world.add_solid(Tag::Floor, Vec2::new(1300.0, 80.0), street);
        let hero = world.add_dynamic(Tag::Hero, Vec2::new(120.0, 146.0), Vec2::new(48.0, 72.0));

        // A stalled frame, then normal ones
        world.step(0.25);
        for _ in 0..30 {
            world.step(DT);
        }

        let body = world.body(hero).unwrap();
        assert!(
            (body.position.y - 146.0).abs() < 1e-3,
            "fell to {:?}",
            body.position
        );
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_long_frame_still_lands_falling_body() {
        let mut world = world_with_floor();
        let hero = world.add_dynamic(Tag::Hero, Vec2::new(0.0, 100.0), Vec2::new(32.0, 32.0));

        world.step(2.0);

        let body = world.body(hero).unwrap();
        assert!((body.position.y - 36.0).abs() < 1e-3);
    }

    #[test]
    fn test_long_frame_reports_sensor_passed_through() {
        let mut world = world_with_floor();
        let hero = world.add_dynamic(Tag::Hero, Vec2::new(0.0, 36.0), Vec2::new(32.0, 32.0));
        let coin = world.add_sensor(Tag::Coin, Vec2::new(150.0, 40.0), Vec2::new(24.0, 42.0));

        world.set_velocity_x(hero, 600.0);
        let began = world.step(0.5);

        assert_eq!(began.len(), 1);
        assert_eq!(began[0].b.id, coin);
        assert!(world.body(hero).unwrap().position.x > 250.0);
    }

    #[test]
    fn test_patrol_offset_is_triangle_wave() {
        let patrol = Patrol {
            distance: 60.0,
            leg_seconds: 1.2,
        };
        assert_eq!(patrol.offset(0.0), 0.0);
        assert!((patrol.offset(0.6) - 30.0).abs() < 1e-4);
        assert!((patrol.offset(1.2) - 60.0).abs() < 1e-4);
        assert!((patrol.offset(1.8) - 30.0).abs() < 1e-4);
        assert!(patrol.offset(2.4).abs() < 1e-4);
    }

    #[test]
    fn test_patrolling_sensor_moves() {
        let mut world: PhysicsWorld<Tag> = PhysicsWorld::default();
        let coin = world.add_sensor(Tag::Coin, Vec2::new(100.0, 0.0), Vec2::new(10.0, 10.0));
        let patrol = Patrol {
            distance: 60.0,
            leg_seconds: 1.2,
        };
        assert!(world.set_patrol(coin, patrol));

        for _ in 0..36 {
            world.step(DT);
        }
        let body = world.body(coin).unwrap();
        assert!((body.position.x - 130.0).abs() < 0.1);
        assert!(body.velocity.x > 0.0);
    }
}
