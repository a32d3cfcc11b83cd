use super::*;
use crate::{
    composition::dsl::{StoryboardBuilder, TrackBuilder, video},
    foundation::core::Canvas,
};

#[test]
fn for_storyboard_copies_canvas_rate_and_length() {
    let sb = StoryboardBuilder::new(
        Canvas {
            width: 320,
            height: 240,
        },
        30.0,
    )
    .track(
        TrackBuilder::new("main")
            .element("v0", video("a.m2v", 1, 12))
            .build()
            .unwrap(),
    )
    .build()
    .unwrap();
    let o = FetchOpts::for_storyboard(&sb);
    assert_eq!((o.target_width, o.target_height), (320, 240));
    assert_eq!(o.target_canvas(), sb.canvas);
    assert_eq!(o.output_frame_rate, 30.0);
    assert_eq!(o.total_output_frames, 12);
    assert!(o.allow_chunk_passthrough);
    o.validate().unwrap();
}

#[test]
fn validate_rejects_bad_values() {
    let ok = FetchOpts {
        target_width: 8,
        target_height: 8,
        ..FetchOpts::default()
    };
    ok.validate().unwrap();
    assert!(FetchOpts::default().validate().is_err());
    assert!(
        FetchOpts {
            output_frame_rate: f64::INFINITY,
            ..ok.clone()
        }
        .validate()
        .is_err()
    );
    assert!(
        FetchOpts {
            max_chunk_bytes: 0,
            ..ok
        }
        .validate()
        .is_err()
    );
}

#[test]
fn empty_filter_macro_is_ignored() {
    let mut o = FetchOpts::default();
    assert!(o.filter_macro().is_none());
    o.filter_macro_file = Some(PathBuf::new());
    assert!(o.filter_macro().is_none());
    o.filter_macro_file = Some(PathBuf::from("sharpen.macro"));
    assert_eq!(o.filter_macro(), Some(Path::new("sharpen.macro")));
}

#[test]
fn json_fills_defaults_and_parses_flag_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opts.json");
    std::fs::write(
        &path,
        r#"{ "target_width": 16, "target_height": 9, "check_flags": ["size", "mpeg_integrity"] }"#,
    )
    .unwrap();
    let o = FetchOpts::from_json_path(&path).unwrap();
    assert_eq!(o.target_width, 16);
    assert_eq!(o.max_chunk_bytes, DEFAULT_MAX_CHUNK_BYTES);
    assert_eq!(
        o.check_flags,
        CheckFlags::SIZE | CheckFlags::MPEG_INTEGRITY
    );

    std::fs::write(&path, r#"{ "check_flags": ["bogus"] }"#).unwrap();
    assert!(matches!(
        FetchOpts::from_json_path(&path),
        Err(StorycutError::Serde(_))
    ));
}
