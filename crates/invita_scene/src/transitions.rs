//! Timeline builders for the scene transitions
//!
//! Builders return None when a region they animate has no target; the
//! controller treats that the same as views that are not mounted yet.

use invita_animation::{Position, Property, PropertyValues, ScrubTrack, Scrub, Step, Timeline};

use crate::config::SceneConfig;
use crate::viewport::ViewportScale;
use crate::views::{EnvelopeView, FoldingCardView};

/// Closed to Extracted, in one go
///
/// Flap opens, drops behind the card, the card lifts, keeps rising while it
/// fades, the envelope shrinks away alongside, and the folding card fades in
/// over the tail end.
pub fn extract(
    envelope: &EnvelopeView,
    card: &FoldingCardView,
    config: &SceneConfig,
    scale: ViewportScale,
) -> Option<Timeline> {
    let flap = envelope.flap()?;
    let inner_card = envelope.inner_card()?;
    let container = envelope.container()?;
    let card_container = card.container()?;
    let open = &config.open;
    let extract = &config.extract;

    let timeline = Timeline::new()
        .then(
            Step::to(flap, PropertyValues::new().with(Property::RotateX, open.flap_angle))
                .duration(open.flap_duration_ms)
                .easing(open.flap_easing),
        )
        .then(Step::set(
            flap,
            PropertyValues::new().with(Property::ZIndex, open.flap_z_index),
        ))
        .then(
            Step::to(
                inner_card,
                PropertyValues::new().with(Property::Y, scale.length(open.lift_y)),
            )
            .duration(open.lift_duration_ms)
            .easing(open.lift_easing)
            .position(Position::Overlap(open.lift_overlap_ms)),
        )
        .then(
            Step::to(
                inner_card,
                PropertyValues::new()
                    .with(Property::Y, scale.length(extract.card_y))
                    .with(Property::Scale, extract.card_scale)
                    .with(Property::Opacity, extract.card_opacity),
            )
            .duration(extract.card_duration_ms)
            .easing(extract.card_easing),
        )
        .then(
            Step::to(
                container,
                PropertyValues::new()
                    .with(Property::Opacity, extract.envelope_opacity)
                    .with(Property::Scale, extract.envelope_scale),
            )
            .duration(extract.envelope_duration_ms)
            .easing(extract.envelope_easing)
            .position(Position::Overlap(extract.envelope_overlap_ms)),
        )
        .then(
            Step::to(
                card_container,
                PropertyValues::new()
                    .with(Property::Opacity, 1.0)
                    .with(Property::Scale, 1.0),
            )
            .duration(extract.reveal_duration_ms)
            .easing(extract.reveal_easing)
            .position(Position::Overlap(extract.reveal_overlap_ms)),
        );

    Some(timeline)
}

/// Extracted back to Closed; undoes every property [`extract`] touched
pub fn close(
    envelope: &EnvelopeView,
    card: &FoldingCardView,
    config: &SceneConfig,
    scale: ViewportScale,
) -> Option<Timeline> {
    let flap = envelope.flap()?;
    let inner_card = envelope.inner_card()?;
    let container = envelope.container()?;
    let card_container = card.container()?;
    let close = &config.close;

    let timeline = Timeline::new()
        .then(
            Step::to(
                card_container,
                PropertyValues::new()
                    .with(Property::Opacity, 0.0)
                    .with(Property::Scale, config.card.hidden_scale),
            )
            .duration(close.fade_duration_ms)
            .easing(close.fade_easing),
        )
        .then(
            Step::to(
                container,
                PropertyValues::new()
                    .with(Property::Opacity, 1.0)
                    .with(Property::Scale, 1.0),
            )
            .duration(close.restore_duration_ms)
            .easing(close.restore_easing),
        )
        .then(
            Step::to(
                inner_card,
                PropertyValues::new()
                    .with(Property::Opacity, 1.0)
                    .with(Property::Scale, 1.0)
                    .with(Property::Y, scale.length(config.open.lift_y)),
            )
            .duration(close.restore_duration_ms)
            .easing(close.restore_easing)
            .position(Position::WithPrevious),
        )
        .then(
            Step::to(inner_card, PropertyValues::new().with(Property::Y, 0.0))
                .duration(close.lower_duration_ms)
                .easing(close.lower_easing),
        )
        .then(
            Step::to(flap, PropertyValues::new().with(Property::RotateX, 0.0))
                .duration(close.flap_duration_ms)
                .easing(close.flap_easing)
                .position(Position::Overlap(close.flap_overlap_ms)),
        )
        .then(Step::set(
            flap,
            PropertyValues::new().with(Property::ZIndex, config.envelope.flap_z_index),
        ));

    Some(timeline)
}

/// Entrance of the envelope: pops in from nothing with a slight twist
pub fn intro(envelope: &EnvelopeView, config: &SceneConfig) -> Option<Timeline> {
    let container = envelope.container()?;
    let intro = &config.intro;

    let timeline = Timeline::new()
        .then(Step::set(
            container,
            PropertyValues::new()
                .with(Property::Scale, intro.scale_from)
                .with(Property::Rotation, intro.rotation_from),
        ))
        .then(
            Step::to(
                container,
                PropertyValues::new()
                    .with(Property::Scale, 1.0)
                    .with(Property::Rotation, 0.0),
            )
            .duration(intro.duration_ms)
            .easing(intro.easing),
        );

    Some(timeline)
}

/// Scroll-driven leaf rotation: the left leaf swings left, the right leaf right
pub fn leaves(card: &FoldingCardView, config: &SceneConfig) -> Option<Scrub> {
    let angle = config.card.leaf_angle;
    let easing = config.card.scrub_easing;

    let scrub = Scrub::new()
        .track(ScrubTrack::new(card.left_leaf()?, Property::RotateY, 0.0, -angle).easing(easing))
        .track(ScrubTrack::new(card.right_leaf()?, Property::RotateY, 0.0, angle).easing(easing));

    Some(scrub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invita_animation::AnimationScheduler;

    fn mounted() -> (AnimationScheduler, EnvelopeView, FoldingCardView) {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let config = SceneConfig::default();
        let envelope = EnvelopeView::mount(&handle, &config).unwrap();
        let card = FoldingCardView::mount(&handle, &config).unwrap();
        (scheduler, envelope, card)
    }

    #[test]
    fn test_extract_step_order() {
        let (_scheduler, envelope, card) = mounted();
        let config = SceneConfig::default();
        let timeline = extract(&envelope, &card, &config, ViewportScale::UNIT).unwrap();

        let starts: Vec<f32> = timeline
            .entry_ids()
            .into_iter()
            .map(|id| timeline.start_time(id).unwrap())
            .collect();

        // flap, z swap, lift (-200ms), rise + fade, envelope (-500ms), reveal (-300ms)
        assert_eq!(starts, vec![0.0, 1500.0, 1300.0, 1700.0, 2000.0, 2200.0]);
        assert_eq!(timeline.duration_ms(), 2800.0);
    }

    #[test]
    fn test_close_step_order() {
        let (_scheduler, envelope, card) = mounted();
        let config = SceneConfig::default();
        let timeline = close(&envelope, &card, &config, ViewportScale::UNIT).unwrap();

        let starts: Vec<f32> = timeline
            .entry_ids()
            .into_iter()
            .map(|id| timeline.start_time(id).unwrap())
            .collect();

        // fade card, restore envelope, restore card (together), lower, flap (-100ms), z restore
        assert_eq!(starts, vec![0.0, 400.0, 400.0, 700.0, 900.0, 1400.0]);
    }

    #[test]
    fn test_extract_distances_follow_viewport_scale() {
        let (_scheduler, envelope, card) = mounted();
        let config = SceneConfig::default();
        let half = ViewportScale::compute(
            crate::viewport::Size::new(272.0, 2000.0),
            crate::viewport::Size::new(480.0, 620.0),
            16.0,
        );
        let timeline = extract(&envelope, &card, &config, half).unwrap();

        let lift = timeline.entry_ids()[2];
        let step = timeline.step(lift).unwrap();
        let lift_y = step.to.get(Property::Y).unwrap();
        assert!((lift_y - config.open.lift_y * half.value()).abs() < 1e-4);
    }

    #[test]
    fn test_leaves_open_outwards() {
        let (_scheduler, _envelope, card) = mounted();
        let scrub = leaves(&card, &SceneConfig::default()).unwrap();

        let samples: Vec<_> = scrub.sample(1.0).collect();
        assert_eq!(samples[0], (card.left_leaf().unwrap(), Property::RotateY, -180.0));
        assert_eq!(samples[1], (card.right_leaf().unwrap(), Property::RotateY, 180.0));
    }
}
