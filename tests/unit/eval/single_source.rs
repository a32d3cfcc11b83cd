use super::*;
use crate::{
    composition::dsl::{StoryboardBuilder, TrackBuilder, color, frame_sequence, silence, video},
    composition::model::{ElementTransform, Storyboard, Track},
    eval::resolver::TimelineResolver,
    foundation::core::Canvas,
};

fn board(tracks: Vec<Track>) -> Storyboard {
    let mut b = StoryboardBuilder::new(
        Canvas {
            width: 64,
            height: 64,
        },
        25.0,
    );
    for t in tracks {
        b = b.track(t);
    }
    b.build().unwrap()
}

#[test]
fn single_video_track_is_eligible() {
    let sb = board(vec![
        TrackBuilder::new("main")
            .element("v0", video("clip.m2v", 10, 14))
            .build()
            .unwrap(),
    ]);
    let r = TimelineResolver::new(&sb, "/m");
    let s = resolve_single_source(&r, MasterFrame(3)).unwrap();
    assert_eq!(s.path, PathBuf::from("/m/clip.m2v"));
    assert_eq!(s.source_frame, 12);
    assert_eq!(s.kind, SingleSourceKind::Video);
}

#[test]
fn silence_tracks_do_not_compete() {
    let sb = board(vec![
        TrackBuilder::new("main")
            .element("v0", video("clip.m2v", 1, 5))
            .build()
            .unwrap(),
        TrackBuilder::new("quiet")
            .element("s0", silence(5))
            .build()
            .unwrap(),
    ]);
    let r = TimelineResolver::new(&sb, "/m");
    assert!(resolve_single_source(&r, MasterFrame(2)).is_ok());
}

#[test]
fn two_contributing_tracks_are_ineligible() {
    let sb = board(vec![
        TrackBuilder::new("main")
            .element("v0", video("clip.m2v", 1, 5))
            .build()
            .unwrap(),
        TrackBuilder::new("top")
            .element("v1", video("other.m2v", 1, 2))
            .build()
            .unwrap(),
    ]);
    let r = TimelineResolver::new(&sb, "/m");
    assert_eq!(
        resolve_single_source(&r, MasterFrame(1)),
        Err(SingleSourceMiss::MultipleTracks)
    );
    // the top track has ended by frame 3
    assert!(resolve_single_source(&r, MasterFrame(3)).is_ok());
}

#[test]
fn color_transform_and_empty_are_ineligible() {
    let sb = board(vec![
        TrackBuilder::new("main")
            .element("c0", color([1, 2, 3, 255], 2))
            .element_with(
                "v0",
                video("clip.m2v", 1, 2),
                ElementTransform {
                    opacity: 0.9,
                    ..Default::default()
                },
            )
            .element("s0", silence(1))
            .build()
            .unwrap(),
    ]);
    let r = TimelineResolver::new(&sb, "/m");
    assert_eq!(
        resolve_single_source(&r, MasterFrame(1)),
        Err(SingleSourceMiss::SolidColor)
    );
    assert_eq!(
        resolve_single_source(&r, MasterFrame(3)),
        Err(SingleSourceMiss::Transformed)
    );
    assert_eq!(
        resolve_single_source(&r, MasterFrame(5)),
        Err(SingleSourceMiss::Empty)
    );
    assert_eq!(
        resolve_single_source(&r, MasterFrame(99)),
        Err(SingleSourceMiss::Empty)
    );
}

#[test]
fn frame_sequence_resolves_numbered_file() {
    let sb = board(vec![
        TrackBuilder::new("main")
            .element("q0", frame_sequence("seq/f_", "jpg", 3, 5, 9))
            .build()
            .unwrap(),
    ]);
    let r = TimelineResolver::new(&sb, "/m");
    let s = resolve_single_source(&r, MasterFrame(2)).unwrap();
    assert_eq!(s.path, PathBuf::from("/m/seq/f_006.jpg"));
    assert_eq!(s.source_frame, 6);
    assert_eq!(s.kind, SingleSourceKind::FrameSequence);
}
