use geometry::prelude::*;
use test_log::test;

use crate::*;

fn mosfet(is_npn: bool, is_horizontal: bool, gate: &str, ec: &str) -> Silicon {
    Silicon::Mosfet {
        is_npn,
        is_horizontal,
        gate_placement: gate.parse().unwrap(),
        ec_placement: ec.parse().unwrap(),
    }
}

#[test]
fn denormalize_inverts_normalize_for_every_valid_pattern() {
    // Every defined bit lies in the low 20 bits.
    let mut valid = 0;
    for bits in 0..(1u32 << 20) {
        let packed = Upc::from_bits(bits);
        if let Ok(cell) = packed.try_normalize() {
            valid += 1;
            assert_eq!(cell.denormalize(), packed, "bits {bits:#x}");
        }
    }
    // 33 metal states × 97 silicon states, minus vias over the 64 MOSFETs.
    assert_eq!(valid, 33 * 97 - 16 * 64);
}

#[test]
fn reserved_bits_are_rejected_and_read_as_empty() {
    for bits in [1 << 6, 1 << 7, 1 << 20, 1 << 31] {
        let packed = Upc::from_bits(bits | 1 << 4);
        assert_eq!(packed.try_normalize(), Err(InvalidUpc(bits | 1 << 4)));
        assert_eq!(packed.normalize(), NormalizedCell::EMPTY);
        assert_eq!(packed.canonicalize(), Upc::EMPTY);
    }
}

#[test]
fn layer_bits_without_presence_are_rejected() {
    // Metal placement without metal.
    assert!(!Upc::from_bits(0b0001).is_valid());
    // Via without metal.
    assert!(!Upc::from_bits(1 << 5).is_valid());
    // N polarity without silicon.
    assert!(!Upc::from_bits(1 << 13).is_valid());
    // Gate bits on an NP region.
    assert!(!Upc::from_bits(1 << 12 | 1 << 16).is_valid());
}

#[test]
fn mosfet_placements_must_follow_their_axes() {
    let ok = NormalizedCell::new(Metal::None, mosfet(true, true, "UD", "LR")).denormalize();
    assert!(ok.is_valid());

    // EC bit on the gate axis of a horizontal MOSFET.
    let bad = Upc::from_bits(ok.bits() | 1 << 8);
    assert!(!bad.is_valid());

    // A via over a MOSFET.
    let via = Upc::from_bits(ok.bits() | 1 << 4 | 1 << 5);
    assert!(!via.is_valid());
}

#[test]
fn denormalize_canonicalizes_unencodable_cells() {
    let cell = NormalizedCell::new(
        Metal::Trace {
            has_via: true,
            placement: Placement::CENTER,
        },
        mosfet(false, false, "ULR", "UDR"),
    );
    let expected = NormalizedCell::new(
        Metal::trace(Placement::CENTER),
        mosfet(false, false, "LR", "UD"),
    );
    assert_eq!(cell.denormalize().normalize(), expected);
}

#[test]
fn byte_layout_is_endian_independent() {
    let cell = NormalizedCell::new(
        Metal::Trace {
            has_via: true,
            placement: "UL".parse().unwrap(),
        },
        Silicon::np(true, "R".parse().unwrap()),
    );
    assert_eq!(cell.denormalize().0, [0b0011_1001, 0b0011_0010, 0, 0]);
}

#[test]
fn placement_strings_round_trip() {
    let p: Placement = "dlU".parse().unwrap();
    assert_eq!(p, Placement::from_sides([Side::Up, Side::Down, Side::Left]));
    assert_eq!(p.to_string(), "UDL");
    assert_eq!("".parse::<Placement>().unwrap(), Placement::CENTER);
    assert_eq!(Placement::CENTER.to_string(), "C");
    assert_eq!("UX".parse::<Placement>(), Err(ParsePlacementError('X')));
}

#[test]
fn rotation_permutes_placement_and_orientation() {
    let cell = NormalizedCell::new(
        Metal::trace("UR".parse().unwrap()),
        mosfet(true, false, "L", "UD"),
    );
    let rotated = cell.rotate_cw();
    assert_eq!(rotated.metal, Metal::trace("RD".parse().unwrap()));
    assert_eq!(rotated.si, mosfet(true, true, "U", "LR"));
    assert!(rotated.denormalize().is_valid());

    let mut back = cell;
    for _ in 0..4 {
        back = back.rotate_cw();
    }
    assert_eq!(back, cell);
    assert_eq!(cell.mirror_horiz().mirror_horiz(), cell);
}

#[test]
fn mosfet_polarity_depends_on_axis() {
    let npn = mosfet(true, true, "", "");
    assert_eq!(npn.polarity_at(Side::Left), Some(true));
    assert_eq!(npn.polarity_at(Side::Up), Some(false));

    let mut si = npn;
    si.set_link(Side::Right, true);
    si.set_link(Side::Down, true);
    assert_eq!(si, mosfet(true, true, "D", "R"));
}
