use cutlist_core::orient::{Grain, RotationDirective, resolve};

#[test]
fn grain_along_width_locks_nominal_orientation() {
    for rotation in [
        RotationDirective::Never,
        RotationDirective::Always,
        RotationDirective::Inherit,
    ] {
        let o = resolve(rotation, Grain::AlongWidth, true, 300.0, 800.0);
        assert!(!o.rotation_allowed);
        assert!(!o.pre_rotated);
        assert_eq!((o.width, o.height), (300.0, 800.0));
        assert!(!o.rotated(false));
    }
}

#[test]
fn grain_along_length_pre_swaps_footprint() {
    let o = resolve(RotationDirective::Always, Grain::AlongLength, true, 300.0, 800.0);
    assert!(!o.rotation_allowed);
    assert!(o.pre_rotated);
    assert_eq!((o.width, o.height), (800.0, 300.0));
    assert!(o.rotated(false));
}

#[test]
fn without_grain_the_directive_decides() {
    let never = resolve(RotationDirective::Never, Grain::None, true, 1.0, 2.0);
    assert!(!never.rotation_allowed);

    let always = resolve(RotationDirective::Always, Grain::None, false, 1.0, 2.0);
    assert!(always.rotation_allowed);

    assert!(resolve(RotationDirective::Inherit, Grain::None, true, 1.0, 2.0).rotation_allowed);
    assert!(!resolve(RotationDirective::Inherit, Grain::None, false, 1.0, 2.0).rotation_allowed);
}

#[test]
fn packer_rotation_flips_reported_flag() {
    let o = resolve(RotationDirective::Always, Grain::None, true, 1.0, 2.0);
    assert!(!o.rotated(false));
    assert!(o.rotated(true));
}

#[test]
fn directives_parse_from_strings() {
    assert_eq!("never".parse::<RotationDirective>().unwrap(), RotationDirective::Never);
    assert_eq!("ALWAYS".parse::<RotationDirective>().unwrap(), RotationDirective::Always);
    assert_eq!(
        "inheritFromMaterial".parse::<RotationDirective>().unwrap(),
        RotationDirective::Inherit
    );
    assert!("sideways".parse::<RotationDirective>().is_err());

    assert_eq!("alongWidthAxis".parse::<Grain>().unwrap(), Grain::AlongWidth);
    assert_eq!("along_length".parse::<Grain>().unwrap(), Grain::AlongLength);
    assert_eq!("".parse::<Grain>().unwrap(), Grain::None);
    assert!(!Grain::None.is_locked());
    assert!(Grain::AlongLength.is_locked());
}
