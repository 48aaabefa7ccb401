//! Collision object sharing demo
//!
//! Builds a small scene of frames and runs the same groups through detectors
//! with exclusive and shared object caches, logging how many backend objects
//! each policy needed.
//!
//! Usage: `sharing_demo [config.toml|config.ron]`

use std::sync::Arc;

use collision_core::collision::{CollisionError, DetectorStats};
use collision_core::config::ConfigError;
use collision_core::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
enum DemoError {
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

struct Scene {
    frames: Vec<Arc<ShapeFrame>>,
}

impl Scene {
    /// A row of overlapping balls with a crate in the middle
    fn build() -> Self {
        let mut frames: Vec<_> = (0..5)
            .map(|i| {
                ShapeFrame::new(
                    format!("ball_{i}"),
                    CollisionShape::sphere(0.6),
                    Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
                )
            })
            .collect();

        frames.push(ShapeFrame::new(
            "crate",
            CollisionShape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            Transform::from_position_rotation(
                Vec3::new(2.0, 0.8, 0.0),
                Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4),
            ),
        ));

        Self { frames }
    }

    fn name_of(&self, id: ShapeFrameId) -> &str {
        self.frames
            .iter()
            .find(|frame| frame.id() == id)
            .map_or("?", |frame| frame.name())
    }
}

fn run_policy<B: CollisionBackend>(
    backend: B,
    config: &DetectorConfig,
    policy: SharingPolicy,
    scene: &Scene,
) -> Result<DetectorStats, DemoError> {
    let config = DetectorConfig {
        sharing_policy: policy,
        ..*config
    };
    let detector = CollisionDetector::from_config(backend, &config);
    let option = *detector.default_option();

    // Overlapping groups: every frame ends up in two of them
    let left = detector.create_collision_group_from(&scene.frames[..4])?;
    let right = detector.create_collision_group_from(&scene.frames[2..])?;
    let all = detector.create_collision_group_from(&scene.frames)?;

    let mut result = CollisionResult::new();
    if all.collide(&option, &mut result) {
        for contact in result.contacts() {
            log::info!(
                "  {} <-> {}: depth {:.3}, normal ({:.2}, {:.2}, {:.2})",
                scene.name_of(contact.frame1),
                scene.name_of(contact.frame2),
                contact.penetration_depth,
                contact.normal.x,
                contact.normal.y,
                contact.normal.z
            );
        }
    }

    result.clear();
    let crossing = left.collide_with(&right, &CollisionOption::binary_check(), &mut result);
    log::info!("  left/right groups collide: {}", crossing);

    let stats = detector.stats();
    log::info!(
        "  {} backend, {} policy: {} objects for {} group slots, {} cache hits, {} cached",
        detector.backend_type(),
        detector.sharing_policy(),
        stats.objects_created,
        left.num_shape_frames() + right.num_shape_frames() + all.num_shape_frames(),
        stats.cache_hits,
        detector.cached_object_count()
    );

    drop((left, right, all));
    let stats = detector.stats();
    log::debug!("  after dropping groups: {} live objects", stats.live_objects());

    Ok(stats)
}

fn run() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading detector config from {}", path);
            DetectorConfig::load_from_file(&path)?
        }
        None => DetectorConfig::default(),
    };

    let scene = Scene::build();
    log::info!("Scene has {} frames", scene.frames.len());

    for policy in [SharingPolicy::Exclusive, SharingPolicy::Shared] {
        log::info!("Running bounding sphere backend with {} sharing", policy);
        let spheres = run_policy(BoundingSphereBackend::new(), &config, policy, &scene)?;

        log::info!("Running primitive backend with {} sharing", policy);
        let primitives = run_policy(PrimitiveBackend::new(), &config, policy, &scene)?;

        log::info!(
            "{} sharing built {} objects in total ({} cache hits), {} still alive",
            policy,
            spheres.objects_created + primitives.objects_created,
            spheres.cache_hits + primitives.cache_hits,
            spheres.live_objects() + primitives.live_objects()
        );
    }

    // A degenerate frame is rejected without disturbing the cache
    let detector = CollisionDetector::from_config(PrimitiveBackend::new(), &config);
    let broken = ShapeFrame::new("broken", CollisionShape::sphere(0.0), Transform::identity());
    if let Err(err) = detector.claim_collision_object(&broken) {
        log::info!("Rejected frame as expected: {}", err);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting collision sharing demo");

    run()?;

    log::info!("Demo finished");
    Ok(())
}
