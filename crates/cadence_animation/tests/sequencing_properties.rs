//! Behavioral guarantees of the sequencing engine
//!
//! These tests drive an animator against an in-memory scene with simulated
//! time and check:
//! - Replaying a step never leaves two sequences alive
//! - Disabled properties are never written
//! - Loops, joins and lookups behave as documented
//! - Toggles land before the first frame

use cadence_animation::{
    AnimationScheduler, AnimationStep, Animator, Easing, LoopType, Sequence, SequenceStatus,
    StepState, Toggle, TriggerMode, Tween,
};
use cadence_core::{
    AnimationHost, Color, Property, PropertyValue, Scene, SceneEvent, SceneNode, TargetId, ToggleKind, Vec3,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

const RECT: TargetId = TargetId(10);
const IMAGE: TargetId = TargetId(11);
const GROUP: TargetId = TargetId(12);
const BADGE: TargetId = TargetId(13);

fn scene() -> Scene {
    Scene::new()
        .with_node(RECT, SceneNode::transform())
        .with_node(IMAGE, SceneNode::graphic())
        .with_node(GROUP, SceneNode::group())
        .with_node(BADGE, SceneNode::new().with_active(false))
}

fn counter() -> (Arc<Mutex<u32>>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(Mutex::new(0));
    let clone = count.clone();
    (count, move || *clone.lock().unwrap() += 1)
}

#[test]
fn test_replay_leaves_one_sequence_and_one_completion() {
    let mut scene = scene();
    let (count, sink) = counter();
    let mut animator = Animator::new().step(
        AnimationStep::new("fade")
            .group(GROUP)
            .fade_to(0.0)
            .duration(1.0)
            .on_complete(sink),
    );

    let first = animator.play_by_name("fade", &mut scene).unwrap();
    animator.tick(0.5, &mut scene);
    let second = animator.play_by_name("fade", &mut scene).unwrap();

    assert!(!animator.scheduler().is_live(first));
    assert!(animator.scheduler().is_live(second));
    assert_eq!(animator.live_count(), 1);

    for _ in 0..10 {
        animator.tick(0.25, &mut scene);
    }
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_disabled_property_never_written() {
    let mut scene = scene();
    let mut step = AnimationStep::new("slide")
        .transform(RECT)
        .move_to(Vec3::new(300.0, 0.0, 0.0))
        .duration(1.0);
    // A far-off scale target that must be ignored
    step.scale.to = Vec3::new(50.0, 50.0, 50.0);
    step.scale.enabled = false;

    let mut animator = Animator::new().step(step);
    animator.play_by_index(0, &mut scene);
    for _ in 0..8 {
        animator.tick(0.25, &mut scene);
    }

    assert_eq!(scene.write_count(RECT, Property::Scale), 0);
    assert_eq!(scene.write_count(RECT, Property::Rotation), 0);
    assert_eq!(scene.property(RECT, Property::Scale), Some(PropertyValue::Scale(Vec3::ONE)));
    assert_eq!(
        scene.property(RECT, Property::Position),
        Some(PropertyValue::Position(Vec3::new(300.0, 0.0, 0.0)))
    );
}

#[test]
fn test_noop_step_creates_nothing() {
    let mut scene = scene();
    let (count, sink) = counter();
    let mut step = AnimationStep::new("empty").transform(RECT).group(GROUP).on_complete(sink);
    step.alpha.to = 0.0;

    let mut animator = Animator::new().step(step);
    assert_eq!(animator.play_by_index(0, &mut scene), None);
    for _ in 0..4 {
        animator.tick(1.0, &mut scene);
    }

    assert_eq!(animator.live_count(), 0);
    assert_eq!(*count.lock().unwrap(), 0);
    assert!(scene.history().is_empty());
}

#[test]
fn test_reset_all_is_idempotent() {
    let mut scene = scene();
    let mut animator = Animator::new()
        .step(
            AnimationStep::new("grow")
                .transform(RECT)
                .scale_to(Vec3::new(2.0, 2.0, 1.0))
                .trigger(TriggerMode::OnStart),
        )
        .step(AnimationStep::new("tint").graphic(IMAGE).color_to(Color::RED));

    animator.start(&mut scene);
    animator.play_by_name("tint", &mut scene);
    animator.tick(0.6, &mut scene);

    animator.reset_all(&mut scene);
    let once = scene.clone();
    animator.reset_all(&mut scene);

    for id in [RECT, IMAGE] {
        assert_eq!(scene.node(id), once.node(id));
    }
    assert_eq!(scene.property(RECT, Property::Scale), Some(PropertyValue::Scale(Vec3::ONE)));
    assert_eq!(scene.property(IMAGE, Property::Color), Some(PropertyValue::Color(Color::WHITE)));
}

#[test]
fn test_reset_later_step_wins() {
    let mut scene = scene();
    let mut animator = Animator::new()
        .step(AnimationStep::new("first").group(GROUP).fade_to(0.0))
        .step(AnimationStep::new("second").group(GROUP).fade_to(0.5));

    // Cache "first" at 1.0, then move alpha before "second" is cached
    let first = animator.id_at(0).unwrap();
    animator.get_mut(first).unwrap().cache_initial_values(&scene);
    scene.set_property(GROUP, PropertyValue::Alpha(0.2));
    animator.start(&mut scene);

    animator.reset_all(&mut scene);
    assert_eq!(scene.property(GROUP, Property::Alpha), Some(PropertyValue::Alpha(0.2)));
}

#[test]
fn test_infinite_loop_never_completes() {
    let mut scene = scene();
    let (count, sink) = counter();
    let mut animator = Animator::new().step(
        AnimationStep::new("pulse")
            .transform(RECT)
            .scale_to(Vec3::new(1.2, 1.2, 1.0))
            .duration(0.3)
            .looped(0, LoopType::Yoyo)
            .on_complete(sink),
    );

    let id = animator.play_by_index(0, &mut scene).unwrap();
    for _ in 0..10_000 {
        animator.tick(1.0 / 60.0, &mut scene);
    }

    assert_eq!(*count.lock().unwrap(), 0);
    assert!(animator.scheduler().is_live(id));
    assert_eq!(animator.state(animator.id_at(0).unwrap()), Some(StepState::Playing));
}

#[test]
fn test_negative_loop_count_is_infinite() {
    let mut scene = scene();
    let (count, sink) = counter();
    let mut animator = Animator::new().step(
        AnimationStep::new("spin")
            .transform(RECT)
            .rotate_to(Vec3::new(0.0, 0.0, 360.0))
            .duration(0.5)
            .looped(-3, LoopType::Incremental)
            .on_complete(sink),
    );

    animator.play_by_index(0, &mut scene);
    for _ in 0..100 {
        animator.tick(0.5, &mut scene);
    }
    assert_eq!(*count.lock().unwrap(), 0);
}

#[test]
fn test_join_barrier_fires_after_longest() {
    let mut scene = scene();
    let (count, sink) = counter();
    let sequence = Sequence::builder()
        .join(Tween::new(GROUP, PropertyValue::Alpha(1.0), PropertyValue::Alpha(0.0)).duration(1.0))
        .join(
            Tween::new(RECT, PropertyValue::Scale(Vec3::ONE), PropertyValue::Scale(Vec3::ZERO))
                .duration(2.0),
        )
        .ease(Easing::Linear)
        .on_complete(Arc::new(sink))
        .build()
        .unwrap();
    assert_eq!(sequence.cycle_duration(), 2.0);

    let mut scheduler = AnimationScheduler::new();
    scheduler.insert(sequence);

    for _ in 0..4 {
        scheduler.tick(0.25, &mut scene);
    }
    assert_eq!(*count.lock().unwrap(), 0, "must not fire at 1.0s");
    assert_eq!(scene.property(GROUP, Property::Alpha), Some(PropertyValue::Alpha(0.0)));

    for _ in 0..3 {
        scheduler.tick(0.25, &mut scene);
    }
    assert_eq!(*count.lock().unwrap(), 0, "must not fire at 1.75s");

    scheduler.tick(0.25, &mut scene);
    assert_eq!(*count.lock().unwrap(), 1);
    assert!(scheduler.is_empty());
}

#[test]
fn test_sequence_status_reports_completion() {
    let mut scene = scene();
    let mut sequence = Sequence::builder()
        .join(Tween::new(GROUP, PropertyValue::Alpha(1.0), PropertyValue::Alpha(0.0)).duration(0.5))
        .build()
        .unwrap();

    assert_eq!(sequence.advance(0.25, &mut scene), SequenceStatus::Running);
    assert_eq!(sequence.advance(0.25, &mut scene), SequenceStatus::Completed);
}

#[test]
fn test_step_level_join_uses_shared_timing() {
    let mut scene = scene();
    let (count, sink) = counter();
    let mut animator = Animator::new().step(
        AnimationStep::new("both")
            .transform(RECT)
            .group(GROUP)
            .scale_to(Vec3::ZERO)
            .fade_to(0.0)
            .delay(0.5)
            .duration(1.0)
            .on_complete(sink),
    );

    animator.play_by_index(0, &mut scene);
    animator.tick(1.0, &mut scene);
    assert_eq!(*count.lock().unwrap(), 0);
    animator.tick(0.5, &mut scene);
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_play_by_name_first_match() {
    let mut scene = scene();
    let mut animator = Animator::new();
    for name in ["A", "B", "X", "X2"] {
        animator.push_step(AnimationStep::new(name).group(GROUP).fade_to(0.0));
    }

    animator.play_by_name("X", &mut scene).unwrap();

    let states: Vec<StepState> = animator
        .steps()
        .map(|(id, _)| animator.state(id).unwrap())
        .collect();
    assert_eq!(
        states,
        vec![StepState::Idle, StepState::Idle, StepState::Playing, StepState::Idle]
    );
}

#[test]
fn test_duplicate_names_play_first() {
    let mut scene = scene();
    let mut animator = Animator::new()
        .step(AnimationStep::new("dup").group(GROUP).fade_to(0.0))
        .step(AnimationStep::new("dup").graphic(IMAGE).color_to(Color::BLUE));

    animator.play_by_name("dup", &mut scene);

    assert_eq!(animator.state(animator.id_at(0).unwrap()), Some(StepState::Playing));
    assert_eq!(animator.state(animator.id_at(1).unwrap()), Some(StepState::Idle));
}

#[test]
fn test_toggle_lands_before_first_frame() {
    let mut scene = scene();
    let mut animator = Animator::new().step(
        AnimationStep::new("reveal")
            .group(GROUP)
            .fade_to(0.0)
            .duration(1.0)
            .toggle(Toggle::object(BADGE, true)),
    );

    animator.play_by_index(0, &mut scene);

    // Time zero: the toggle happened, no frame did
    assert!(scene.node(BADGE).unwrap().active);
    assert_eq!(scene.property(GROUP, Property::Alpha), Some(PropertyValue::Alpha(1.0)));
    assert_eq!(scene.history(), &[SceneEvent::Active(BADGE, ToggleKind::Object, true)]);

    animator.tick(0.1, &mut scene);
    assert!(matches!(scene.history()[1], SceneEvent::Set(GROUP, _)));
}

#[test]
fn test_toggle_not_rolled_back_by_reset() {
    let mut scene = scene();
    let mut animator = Animator::new().step(
        AnimationStep::new("reveal")
            .group(GROUP)
            .fade_to(0.0)
            .toggle(Toggle::object(BADGE, true)),
    );

    animator.start(&mut scene);
    animator.play_by_index(0, &mut scene);
    animator.reset_all(&mut scene);

    assert!(scene.node(BADGE).unwrap().active);
    assert_eq!(scene.property(GROUP, Property::Alpha), Some(PropertyValue::Alpha(1.0)));
}

#[test]
fn test_toggle_only_step_applies_without_sequence() {
    let mut scene = scene();
    let mut animator = Animator::new().step(
        AnimationStep::new("badge").toggle(Toggle::object(BADGE, true)),
    );

    assert_eq!(animator.play_by_index(0, &mut scene), None);
    assert!(scene.node(BADGE).unwrap().active);
}

#[test]
fn test_target_destroyed_mid_play_is_tolerated() {
    let mut scene = scene();
    let mut animator = Animator::new().step(
        AnimationStep::new("fade")
            .group(GROUP)
            .fade_to(0.0)
            .easing(Easing::Linear),
    );

    animator.play_by_index(0, &mut scene);
    animator.tick(0.25, &mut scene);
    scene.remove(GROUP);

    animator.tick(0.25, &mut scene);
    assert_eq!(animator.tick(1.0, &mut scene).len(), 1);
}

#[test]
fn test_cache_survives_later_plays() {
    let mut scene = scene();
    let mut animator = Animator::new().step(
        AnimationStep::new("fade").group(GROUP).fade_to(0.0).duration(0.5),
    );

    animator.start(&mut scene);
    animator.play_by_index(0, &mut scene);
    animator.tick(0.5, &mut scene);

    let id = animator.id_at(0).unwrap();
    assert!(!animator.get_mut(id).unwrap().cache_initial_values(&scene));

    animator.reset_all(&mut scene);
    assert_eq!(scene.property(GROUP, Property::Alpha), Some(PropertyValue::Alpha(1.0)));
}
