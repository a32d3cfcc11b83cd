use super::*;

#[test]
fn contains_and_missing() {
    let requested = CheckFlags::SIZE | CheckFlags::MPEG_INTEGRITY;
    assert!(requested.contains(CheckFlags::SIZE));
    assert!(!requested.contains(CheckFlags::PNG));

    let satisfied = CheckFlags::SIZE | CheckFlags::PNG;
    assert_eq!(requested.missing_from(satisfied), CheckFlags::MPEG_INTEGRITY);
    assert!(requested.missing_from(requested | CheckFlags::JPG).is_empty());
}

#[test]
fn parse_accepts_aliases_and_separators() {
    let flags: CheckFlags = "size| JPEG ,png".parse().unwrap();
    assert_eq!(flags, CheckFlags::SIZE | CheckFlags::JPG | CheckFlags::PNG);
    assert_eq!("".parse::<CheckFlags>().unwrap(), CheckFlags::NONE);
    assert!("size,bogus".parse::<CheckFlags>().is_err());
}

#[test]
fn json_uses_flag_names() {
    let flags = CheckFlags::FULL_FRAME | CheckFlags::VCODEC_NAME;
    let s = serde_json::to_string(&flags).unwrap();
    assert_eq!(s, r#"["full_frame","vcodec_name"]"#);

    let de: CheckFlags = serde_json::from_str(r#"["mpeg_integrity","size"]"#).unwrap();
    assert_eq!(de, CheckFlags::SIZE | CheckFlags::MPEG_INTEGRITY);
    assert!(serde_json::from_str::<CheckFlags>(r#"["nope"]"#).is_err());
}

#[test]
fn display_and_debug_list_names() {
    let flags = CheckFlags::SIZE | CheckFlags::PNG;
    assert_eq!(flags.to_string(), "size,png");
    assert_eq!(format!("{flags:?}"), "CheckFlags(SIZE | PNG)");
    assert_eq!(format!("{:?}", CheckFlags::NONE), "CheckFlags(NONE)");
}
