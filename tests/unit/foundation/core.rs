use super::*;

#[test]
fn master_frame_rejects_zero() {
    assert!(MasterFrame::new(0).is_err());
    assert_eq!(MasterFrame::new(1).unwrap(), MasterFrame::FIRST);
}

#[test]
fn master_frame_offsets_and_remaining() {
    let f = MasterFrame(7);
    assert_eq!(f.offset(3), MasterFrame(10));
    assert_eq!(f.zero_based(), 6);
    assert_eq!(f.remaining_after(10), 3);
    assert_eq!(f.remaining_after(5), 0);
}

#[test]
fn canvas_match_is_exact() {
    let c = Canvas {
        width: 320,
        height: 240,
    };
    assert!(c.matches(320, 240));
    assert!(!c.matches(320, 241));
}
