//! Transient actors: comets with fixed-length trails and the patrol craft that
//! loops past every body.

use glam::Vec3;
use rand::Rng;

/// Comets farther than this from the origin are respawned inside the spawn box.
pub const COMET_RESET_DISTANCE: f32 = 300.0;
/// Where the patrol craft starts and where every loop ends.
pub const PATROL_HOME: Vec3 = Vec3::new(-200.0, 50.0, -100.0);

/// Axis-aligned box centred at the origin that comets spawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnBox {
    pub size: Vec3,
}

impl Default for SpawnBox {
    fn default() -> Self {
        Self {
            size: Vec3::new(400.0, 200.0, 200.0),
        }
    }
}

impl SpawnBox {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            (rng.gen::<f32>() - 0.5) * self.size.x,
            (rng.gen::<f32>() - 0.5) * self.size.y,
            (rng.gen::<f32>() - 0.5) * self.size.z,
        )
    }

    pub fn contains(&self, p: Vec3) -> bool {
        (p.abs() - self.size * 0.5).max_element() <= 0.0
    }

    pub fn diagonal(&self) -> f32 {
        self.size.length()
    }
}

/// Last `len` head positions, newest first. The length never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: Vec<Vec3>,
}

impl Trail {
    /// A trail of `len` slots, all at `start`.
    pub fn new(len: usize, start: Vec3) -> Self {
        Self {
            points: vec![start; len],
        }
    }

    /// Drop the oldest slot and write `head` at slot 0.
    pub fn push_head(&mut self, head: Vec3) {
        if self.points.is_empty() {
            return;
        }
        self.points.rotate_right(1);
        self.points[0] = head;
    }

    pub fn head(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Comet {
    pub position: Vec3,
    pub velocity: Vec3,
    pub trail: Trail,
    /// Times the comet has been pulled back into the spawn box.
    pub respawns: u32,
}

impl Comet {
    pub fn spawn<R: Rng + ?Sized>(spawn: &SpawnBox, trail_len: usize, rng: &mut R) -> Self {
        let position = spawn.sample(rng);
        let velocity = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 2.0,
            (rng.gen::<f32>() - 0.5) * 2.0,
            (rng.gen::<f32>() - 0.5) * 2.0,
        );
        Self {
            position,
            velocity,
            trail: Trail::new(trail_len, position),
            respawns: 0,
        }
    }

    /// Move one frame. A comet past the reset distance jumps back into the box
    /// keeping its velocity and trail.
    pub fn advance<R: Rng + ?Sized>(&mut self, spawn: &SpawnBox, rng: &mut R) {
        self.position += self.velocity;
        if self.position.length() > COMET_RESET_DISTANCE {
            self.position = spawn.sample(rng);
            self.respawns += 1;
        }
        self.trail.push_head(self.position);
    }
}

/// Flying saucer on a closed loop of waypoints.
#[derive(Debug, Clone)]
pub struct PatrolCraft {
    pub waypoints: Vec<Vec3>,
    /// Fraction of the loop covered, always in `[0, 1)`.
    pub progress: f32,
    pub increment: f32,
    /// Number of times the loop has been rebuilt after a wrap.
    pub regenerations: u32,
    pub position: Vec3,
    pub yaw: f32,
    pub roll: f32,
}

impl PatrolCraft {
    pub fn new<R: Rng + ?Sized>(body_positions: &[Vec3], increment: f32, rng: &mut R) -> Self {
        Self {
            waypoints: generate_path(body_positions, rng),
            progress: 0.0,
            increment,
            regenerations: 0,
            position: PATROL_HOME,
            yaw: 0.0,
            roll: 0.0,
        }
    }

    /// Step along the loop. On reaching the end the overshoot carries into the
    /// next loop and a fresh path is generated once.
    pub fn advance<R: Rng + ?Sized>(&mut self, body_positions: &[Vec3], elapsed_seconds: f64, rng: &mut R) {
        self.progress += self.increment;
        if self.progress >= 1.0 {
            self.progress -= 1.0;
            if !(0.0..self.increment).contains(&self.progress) {
                self.progress = 0.0;
            }
            self.waypoints = generate_path(body_positions, rng);
            self.regenerations += 1;
        }

        let n = self.waypoints.len();
        if n >= 2 {
            let sp = self.progress * (n - 1) as f32;
            let current = (sp.floor() as usize).min(n - 1);
            let next = (current + 1).min(n - 1);
            let t = sp - current as f32;
            let a = self.waypoints[current];
            let b = self.waypoints[next];
            self.position = a.lerp(b, t);
            let dir = (b - a).normalize_or_zero();
            if dir != Vec3::ZERO {
                self.yaw = dir.x.atan2(dir.z);
            }
        } else if let Some(&only) = self.waypoints.first() {
            self.position = only;
        }
        self.roll = (elapsed_seconds.sin() * 0.1) as f32;
    }
}

/// One waypoint near each body, in order, then home.
pub fn generate_path<R: Rng + ?Sized>(body_positions: &[Vec3], rng: &mut R) -> Vec<Vec3> {
    let mut path: Vec<Vec3> = body_positions
        .iter()
        .map(|&p| {
            p + Vec3::new(
                (rng.gen::<f32>() - 0.5) * 40.0,
                (rng.gen::<f32>() - 0.5) * 30.0 + 20.0,
                (rng.gen::<f32>() - 0.5) * 40.0,
            )
        })
        .collect();
    path.push(PATROL_HOME);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn bodies() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(100.0, 20.0, -30.0),
            Vec3::new(200.0, -10.0, -50.0),
        ]
    }

    #[test]
    fn trail_keeps_length_and_newest_first() {
        let mut trail = Trail::new(4, Vec3::ZERO);
        for i in 1..=6 {
            trail.push_head(Vec3::splat(i as f32));
            assert_eq!(trail.len(), 4);
        }
        assert_eq!(trail.head(), Some(Vec3::splat(6.0)));
        assert_eq!(trail.points()[3], Vec3::splat(3.0));
    }

    #[test]
    fn comet_trail_length_is_invariant_across_ticks() {
        let mut rng = StdRng::seed_from_u64(4);
        let spawn = SpawnBox::default();
        let mut comet = Comet::spawn(&spawn, 50, &mut rng);
        for _ in 0..1000 {
            comet.advance(&spawn, &mut rng);
            assert_eq!(comet.trail.len(), 50);
            assert_eq!(comet.trail.head(), Some(comet.position));
        }
    }

    #[test]
    fn runaway_comet_is_back_in_the_box_next_tick() {
        let mut rng = StdRng::seed_from_u64(5);
        let spawn = SpawnBox::default();
        let mut comet = Comet::spawn(&spawn, 50, &mut rng);
        comet.position = Vec3::new(299.5, 0.0, 0.0);
        comet.velocity = Vec3::new(0.9, 0.0, 0.0);
        let velocity = comet.velocity;
        comet.advance(&spawn, &mut rng);
        assert_eq!(comet.respawns, 1);
        assert!(spawn.contains(comet.position));
        assert!(comet.position.length() <= spawn.diagonal());
        assert_eq!(comet.velocity, velocity);
        assert_eq!(comet.trail.len(), 50);
    }

    #[test]
    fn path_visits_each_body_then_home() {
        let mut rng = StdRng::seed_from_u64(6);
        let positions = bodies();
        let path = generate_path(&positions, &mut rng);
        assert_eq!(path.len(), positions.len() + 1);
        assert_eq!(*path.last().unwrap(), PATROL_HOME);
        for (wp, body) in path.iter().zip(&positions) {
            let d = *wp - *body;
            assert!(d.x.abs() <= 20.0 && d.z.abs() <= 20.0);
            assert!(d.y >= 5.0 && d.y <= 35.0);
        }
    }

    #[test]
    fn progress_wraps_into_first_increment_and_regenerates_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let positions = bodies();
        let mut craft = PatrolCraft::new(&positions, 0.0003, &mut rng);
        let mut wraps = 0;
        let mut previous = craft.progress;
        for frame in 0..10_000 {
            craft.advance(&positions, frame as f64 / 60.0, &mut rng);
            assert!(craft.progress >= 0.0 && craft.progress < 1.0);
            if craft.progress < previous {
                wraps += 1;
                assert!(craft.progress < craft.increment, "wrapped to {}", craft.progress);
                assert_eq!(craft.regenerations, wraps);
            }
            previous = craft.progress;
        }
        // 10_000 * 0.0003 = 3 loops.
        assert!((2..=3).contains(&wraps), "wraps = {wraps}");
        assert_eq!(craft.regenerations, wraps);
    }

    #[test]
    fn craft_faces_along_its_segment_and_rolls_gently() {
        let mut rng = StdRng::seed_from_u64(8);
        let positions = bodies();
        let mut craft = PatrolCraft::new(&positions, 0.0003, &mut rng);
        craft.waypoints = vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), PATROL_HOME];
        craft.advance(&positions, 1.0, &mut rng);
        assert!((craft.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!(craft.position.x > 0.0 && craft.position.x < 10.0);
        assert!(craft.roll.abs() <= 0.1);
        assert!((craft.roll - (1.0f32.sin() * 0.1)).abs() < 1e-6);
    }
}
