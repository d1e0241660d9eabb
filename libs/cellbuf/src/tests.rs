use geometry::prelude::*;
use test_log::test;
use upc::{Metal, NormalizedCell, Placement, Silicon, Upc};

use crate::*;

fn c(x: i32, y: i32) -> CellCoord {
    CellCoord::new(x, y)
}

fn p(s: &str) -> Placement {
    s.parse().unwrap()
}

fn metal_row(from: i32, to: i32) -> Buffer {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(from, 0), c(to, 0), false);
    buffer
}

#[test]
fn manhattan_path_takes_the_requested_leg_first() {
    assert_eq!(
        manhattan_path(c(0, 0), c(3, 2), true),
        [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (3, 2)].map(CellCoord::from)
    );
    assert_eq!(
        manhattan_path(c(0, 0), c(-2, -1), false),
        [(0, 0), (-1, 0), (-2, 0), (-2, -1)].map(CellCoord::from)
    );
    assert_eq!(manhattan_path(c(5, 5), c(5, 5), true), [c(5, 5)]);
}

#[test]
fn manhattan_path_runs_along_the_grid_edge() {
    assert_eq!(
        manhattan_path(c(i32::MAX - 2, 0), c(i32::MAX, 0), false),
        [c(i32::MAX - 2, 0), c(i32::MAX - 1, 0), c(i32::MAX, 0)]
    );
    assert_eq!(
        manhattan_path(c(i32::MIN, i32::MAX), c(i32::MIN + 1, i32::MAX - 1), true),
        [
            c(i32::MIN, i32::MAX),
            c(i32::MIN, i32::MAX - 1),
            c(i32::MIN + 1, i32::MAX - 1)
        ]
    );
}

#[test]
fn chunk_store_reclaims_emptied_chunks() {
    let mut store = ChunkStore::<u8>::new();
    store.set(c(-1, -1), 5);
    store.set(c(40, 3), 7);
    assert_eq!(store.chunk_count(), 2);
    assert_eq!(store.get(c(-1, -1)), 5);
    assert_eq!(store.get(c(-2, -1)), 0);
    assert_eq!(store.cell_count(), 2);

    assert_eq!(store.set(c(-1, -1), 0), 5);
    assert_eq!(store.chunk_count(), 1);
    assert_eq!(store.chunk(ChunkCoord::new(1, 0)).map(|c| c.occupied()), Some(1));
}

#[test]
fn clones_share_chunks_until_written() {
    let a = metal_row(0, 40);
    let mut b = a.clone();
    assert!(a.store().shares_chunk(b.store(), ChunkCoord::new(0, 0)));
    assert!(a.store().shares_chunk(b.store(), ChunkCoord::new(1, 0)));

    b.clear_cell_metal(c(35, 0));
    assert!(a.store().shares_chunk(b.store(), ChunkCoord::new(0, 0)));
    assert!(!a.store().shares_chunk(b.store(), ChunkCoord::new(1, 0)));
    assert_eq!(a.cell_count(), 41);
    assert_eq!(b.cell_count(), 40);
    assert!(a.metal_linked(c(34, 0), Side::Right));
    assert!(!b.cell(c(34, 0)).metal.links(Side::Right));
}

#[test]
fn draw_si_links_consecutive_path_cells() {
    let mut buffer = Buffer::new();
    buffer.draw_si(c(0, 0), c(3, 2), true, true);
    assert_eq!(buffer.cell_count(), 6);
    assert_eq!(buffer.cell(c(0, 0)).si, Silicon::np(true, p("U")));
    assert_eq!(buffer.cell(c(0, 2)).si, Silicon::np(true, p("DR")));
    assert_eq!(buffer.cell(c(3, 2)).si, Silicon::np(true, p("L")));
    assert!(buffer.cell(c(1, 0)).is_empty());
    assert!(buffer.validate().is_empty());
}

#[test]
fn draw_si_extends_same_polarity_and_refuses_opposite() {
    let mut buffer = Buffer::new();
    buffer.draw_si(c(0, 0), c(1, 0), false, true);
    buffer.draw_si(c(1, 0), c(1, 1), true, true);
    assert_eq!(buffer.cell(c(1, 0)).si, Silicon::np(true, p("UL")));

    buffer.draw_si(c(1, 1), c(2, 1), false, false);
    assert_eq!(buffer.cell(c(1, 1)).si, Silicon::np(true, p("D")));
    assert_eq!(buffer.cell(c(2, 1)).si, Silicon::np(false, Placement::CENTER));
    assert!(buffer.validate().is_empty());
}

#[test]
fn crossing_a_strip_of_opposite_silicon_places_a_mosfet() {
    let mut buffer = Buffer::new();
    buffer.draw_si(c(2, -1), c(2, 1), true, false);
    buffer.draw_si(c(0, 0), c(4, 0), false, true);

    assert_eq!(
        buffer.cell(c(2, 0)).si,
        Silicon::Mosfet {
            is_npn: false,
            is_horizontal: false,
            gate_placement: p("LR"),
            ec_placement: p("UD"),
        }
    );
    assert_eq!(buffer.cell(c(1, 0)).si, Silicon::np(true, p("LR")));
    assert!(buffer.validate().is_empty());

    // A via cannot sit on the junction.
    assert!(!buffer.draw_via(c(2, 0)));
    assert!(!buffer.cell(c(2, 0)).metal.is_present());
}

#[test]
fn turning_on_opposite_silicon_does_not_place_a_mosfet() {
    let mut buffer = Buffer::new();
    buffer.draw_si(c(0, -1), c(0, 1), true, false);
    buffer.draw_si(c(-1, 0), c(0, 2), false, true);
    assert_eq!(buffer.cell(c(0, 0)).si, Silicon::np(false, p("UD")));
    assert!(buffer.validate().is_empty());
}

#[test]
fn clearing_a_cell_retracts_neighbor_links() {
    let mut buffer = Buffer::new();
    buffer.draw_si(c(0, 0), c(2, 0), false, true);
    buffer.draw_metal(c(0, 0), c(2, 0), false);
    buffer.draw_via(c(1, 0));

    buffer.clear_cell_si(c(1, 0));
    assert_eq!(buffer.cell(c(0, 0)).si, Silicon::np(true, Placement::CENTER));
    assert_eq!(buffer.cell(c(2, 0)).si, Silicon::np(true, Placement::CENTER));
    assert_eq!(buffer.cell(c(1, 0)).metal, Metal::trace(p("LR")));

    buffer.clear_metal(c(0, 0), c(1, 0), true);
    assert!(buffer.cell(c(1, 0)).is_empty());
    assert_eq!(buffer.cell(c(2, 0)).metal, Metal::trace(Placement::CENTER));
    assert_eq!(buffer.cell_count(), 2);
    assert!(buffer.validate().is_empty());
}

#[test]
fn vias_bridge_one_cell() {
    let mut buffer = Buffer::new();
    assert!(buffer.draw_via(c(0, 0)));
    assert_eq!(
        buffer.cell(c(0, 0)).metal,
        Metal::Trace {
            has_via: true,
            placement: Placement::CENTER
        }
    );
    buffer.draw_metal(c(0, 0), c(0, 1), true);
    assert!(buffer.cell(c(0, 0)).metal.has_via());
    buffer.clear_via(c(0, 0));
    assert_eq!(buffer.cell(c(0, 0)).metal, Metal::trace(p("U")));
}

#[test]
fn direct_links_require_adjacent_cells() {
    let mut buffer = Buffer::new();
    assert!(buffer.draw_si_link(None, c(0, 0), false));
    assert!(buffer.draw_si_link(Some(c(0, 0)), c(0, 1), false));
    assert!(buffer.si_linked(c(0, 0), Side::Up));

    assert!(!buffer.draw_metal_link(Some(c(0, 0)), c(3, 3)));
    assert_eq!(buffer.cell(c(3, 3)).metal, Metal::trace(Placement::CENTER));
    assert!(!buffer.cell(c(0, 0)).metal.is_present());
    assert!(buffer.validate().is_empty());
}

#[test]
fn edits_keep_links_reciprocal() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(0, 0), c(6, 4), true);
    buffer.draw_metal(c(3, -2), c(3, 6), true);
    buffer.draw_si(c(-1, 2), c(7, 2), false, true);
    buffer.draw_si(c(5, -1), c(5, 5), true, false);
    buffer.clear_metal(c(0, 3), c(6, 3), false);
    buffer.clear_si(c(2, 2), c(2, 2), false);
    buffer.draw_via(c(4, 2));
    buffer.clear_selection_border(Rect::from_sides(4, 0, 6, 3));
    buffer.draw_si_link(Some(c(0, 0)), c(1, 0), true);
    assert!(buffer.validate().is_empty());
    assert_eq!(buffer.prune_dangling_links(), 0);
}

#[test]
fn fix_all_cells_canonicalizes_once() {
    let mut buffer = metal_row(0, 1);
    buffer.set_cell(c(9, 9), Upc::from_bits(1 << 31 | 1 << 4));
    assert_eq!(buffer.cell_count(), 3);
    assert_eq!(buffer.fix_all_cells(), 1);
    assert_eq!(buffer.cell_count(), 2);
    let fixed = buffer.clone();
    assert_eq!(buffer.fix_all_cells(), 0);
    assert_eq!(buffer, fixed);
}

#[test]
fn rotation_and_mirroring_preserve_connectivity() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(0, 0), c(0, 2), true);
    buffer.draw_si(c(1, 0), c(3, 1), false, false);
    buffer.draw_si(c(2, -1), c(2, 2), true, true);

    let rotated = buffer.rotate_to_new();
    assert_eq!(rotated.cell(c(0, 0)).metal, Metal::trace(p("R")));
    assert_eq!(rotated.cell(c(2, 0)).metal, Metal::trace(p("L")));
    assert!(rotated.validate().is_empty());

    let mut back = buffer.clone();
    for _ in 0..4 {
        back = back.rotate_to_new();
    }
    assert_eq!(back, buffer);

    let mirrored = buffer.mirror_to_new();
    assert_eq!(mirrored.cell(c(-1, 0)).si, buffer.cell(c(1, 0)).si.mirror_horiz());
    assert!(mirrored.validate().is_empty());
    assert_eq!(mirrored.mirror_to_new(), buffer);
}

#[test]
fn serialization_is_independent_of_edit_history() {
    let a = metal_row(0, 2);
    let mut b = Buffer::new();
    b.draw_metal(c(100, 100), c(100, 120), true);
    b.draw_metal(c(2, 0), c(0, 0), false);
    b.clear_metal(c(100, 100), c(100, 120), true);

    assert_eq!(b.chunk_count(), 1);
    assert_eq!(a.to_bytes(), b.to_bytes());
    assert_eq!(Buffer::from_bytes(&a.to_bytes()).unwrap(), a);
    assert_eq!(Buffer::from_base64_string(&a.to_base64_string()).unwrap(), a);
    assert_eq!(Buffer::new().to_bytes(), b"UPCB\x01\x00\x00\x00\x00");
}

#[test]
fn from_bytes_rejects_malformed_input() {
    let bytes = metal_row(0, 1).to_bytes();

    let mut bad = bytes.clone();
    bad[0] = b'X';
    assert!(matches!(Buffer::from_bytes(&bad), Err(DecodeError::BadMagic(_))));

    let mut bad = bytes.clone();
    bad[4] = 9;
    assert!(matches!(
        Buffer::from_bytes(&bad),
        Err(DecodeError::UnsupportedVersion(9))
    ));

    assert!(matches!(
        Buffer::from_bytes(&bytes[..bytes.len() - 1]),
        Err(DecodeError::Truncated)
    ));

    let mut bad = bytes.clone();
    bad.push(0);
    assert!(matches!(
        Buffer::from_bytes(&bad),
        Err(DecodeError::TrailingBytes(1))
    ));

    // Point the second entry at the first coordinate.
    let mut bad = bytes.clone();
    bad[21..25].copy_from_slice(&0i32.to_le_bytes());
    assert!(matches!(
        Buffer::from_bytes(&bad),
        Err(DecodeError::DuplicateCell(_))
    ));

    let mut bad = bytes.clone();
    bad[17..21].copy_from_slice(&[0, 0, 0, 0x80]);
    assert!(matches!(
        Buffer::from_bytes(&bad),
        Err(DecodeError::InvalidCell { .. })
    ));

    assert!(matches!(
        Buffer::from_base64_string("not base64!"),
        Err(DecodeError::Base64(_))
    ));
}

#[test]
fn clone_selection_drops_links_leaving_the_selection() {
    let buffer = metal_row(0, 4);
    let clone = buffer.clone_selection(Rect::from_sides(1, -1, 3, 1), c(1, 0));
    assert_eq!(clone.cell_count(), 3);
    assert_eq!(clone.cell(c(0, 0)).metal, Metal::trace(p("R")));
    assert_eq!(clone.cell(c(1, 0)).metal, Metal::trace(p("LR")));
    assert_eq!(clone.cell(c(2, 0)).metal, Metal::trace(p("L")));
    assert!(clone.validate().is_empty());

    let mut target = Buffer::new();
    target.paste_at(c(10, 10), &clone);
    assert!(target.metal_linked(c(10, 10), Side::Right));
    assert!(target.metal_linked(c(11, 10), Side::Right));
}

#[test]
fn paste_overwrites_and_retracts_unreturned_links() {
    let mut buffer = metal_row(0, 2);
    let mut patch = Buffer::new();
    patch.draw_si(c(0, 0), c(0, 0), false, true);

    buffer.paste_at(c(1, 0), &patch);
    assert_eq!(
        buffer.cell(c(1, 0)),
        NormalizedCell::new(Metal::None, Silicon::np(true, Placement::CENTER))
    );
    assert_eq!(buffer.cell(c(0, 0)).metal, Metal::trace(Placement::CENTER));
    assert_eq!(buffer.cell(c(2, 0)).metal, Metal::trace(Placement::CENTER));
    assert!(buffer.validate().is_empty());
}

#[test]
fn clearing_selections() {
    let mut buffer = metal_row(0, 5);
    buffer.clear_selection(Rect::from_sides(2, -1, 3, 1));
    assert_eq!(buffer.cell_count(), 4);
    assert_eq!(buffer.cell(c(1, 0)).metal, Metal::trace(p("L")));
    assert_eq!(buffer.cell(c(4, 0)).metal, Metal::trace(p("R")));

    let mut buffer = metal_row(0, 4);
    buffer.clear_selection_border(Rect::from_sides(1, -1, 3, 1));
    assert_eq!(buffer.cell_count(), 3);
    assert_eq!(buffer.cell(c(2, 0)).metal, Metal::trace(Placement::CENTER));
    assert_eq!(buffer.cell(c(0, 0)).metal, Metal::trace(Placement::CENTER));
    assert!(buffer.validate().is_empty());
}

#[test]
fn validation_reports_and_pruning_repairs_raw_writes() {
    let mut buffer = Buffer::new();
    buffer.set_cell(
        c(0, 0),
        NormalizedCell::new(Metal::trace(p("R")), Silicon::None).denormalize(),
    );
    buffer.set_cell(
        c(0, 1),
        NormalizedCell::new(Metal::None, Silicon::np(true, p("R"))).denormalize(),
    );
    buffer.set_cell(
        c(1, 1),
        NormalizedCell::new(Metal::None, Silicon::np(false, p("L"))).denormalize(),
    );

    let issues = buffer.validate();
    assert_eq!(issues.len(), 3);
    assert!(issues.has_error());
    assert_eq!(
        issues.iter().next().map(|issue| issue.cause().clone()),
        Some(Cause::DanglingMetalLink {
            coord: c(0, 0),
            side: Side::Right
        })
    );

    assert_eq!(buffer.prune_dangling_links(), 3);
    assert!(buffer.validate().is_empty());
}

#[test]
fn editing_at_the_grid_edge() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(i32::MAX - 1, 0), c(i32::MAX, 0), false);
    assert!(buffer.metal_linked(c(i32::MAX - 1, 0), Side::Right));
    assert!(!buffer.metal_linked(c(i32::MAX, 0), Side::Right));

    buffer.draw_si(c(i32::MAX, i32::MIN), c(i32::MAX, i32::MIN), true, true);
    buffer.clear_cell(c(i32::MAX, i32::MIN));
    buffer.clear_cell_metal(c(i32::MAX, 0));
    assert_eq!(buffer.cell_count(), 1);
    assert_eq!(buffer.cell(c(i32::MAX - 1, 0)).metal, Metal::trace(Placement::CENTER));
    assert!(buffer.validate().is_empty());
}

#[test]
fn links_off_the_grid_edge_are_dangling() {
    let mut buffer = Buffer::new();
    buffer.set_cell(
        c(i32::MAX, 0),
        NormalizedCell::new(Metal::trace(p("R")), Silicon::np(true, p("R"))).denormalize(),
    );
    let buffer = Buffer::from_bytes(&buffer.to_bytes()).unwrap();

    let causes: Vec<_> = buffer
        .validate()
        .iter()
        .map(|issue| issue.cause().clone())
        .collect();
    assert_eq!(
        causes,
        vec![
            Cause::DanglingMetalLink {
                coord: c(i32::MAX, 0),
                side: Side::Right
            },
            Cause::DanglingSiLink {
                coord: c(i32::MAX, 0),
                side: Side::Right
            },
        ]
    );

    let mut buffer = buffer;
    assert_eq!(buffer.prune_dangling_links(), 2);
    assert!(buffer.validate().is_empty());
}

#[test]
fn paste_and_clone_skip_cells_off_the_grid() {
    let mut target = Buffer::new();
    target.paste_at(c(i32::MAX - 1, 0), &metal_row(0, 2));
    assert_eq!(target.cell_count(), 2);
    assert_eq!(target.cell(c(i32::MAX, 0)).metal, Metal::trace(p("L")));
    assert!(target.validate().is_empty());

    let clone = metal_row(-2, 0).clone_selection(Rect::from_sides(-2, 0, 0, 0), c(i32::MAX, 0));
    assert_eq!(clone.cell_count(), 2);
    assert_eq!(clone.cell(c(i32::MIN, 0)).metal, Metal::trace(p("R")));
    assert_eq!(clone.cell(c(-i32::MAX, 0)).metal, Metal::trace(p("L")));
    assert!(clone.validate().is_empty());
}

#[test]
fn transforms_drop_links_that_wrap_the_grid() {
    let buffer = metal_row(i32::MIN, i32::MIN + 1);
    let mirrored = buffer.mirror_to_new();
    assert_eq!(mirrored.cell_count(), 2);
    assert_eq!(mirrored.cell(c(i32::MIN, 0)).metal, Metal::trace(Placement::CENTER));
    assert_eq!(mirrored.cell(c(i32::MAX, 0)).metal, Metal::trace(Placement::CENTER));
    assert!(mirrored.validate().is_empty());

    let rotated = buffer.rotate_to_new();
    assert_eq!(rotated.cell(c(0, i32::MIN)).metal, Metal::trace(Placement::CENTER));
    assert_eq!(rotated.cell(c(0, i32::MAX)).metal, Metal::trace(Placement::CENTER));
    assert!(rotated.validate().is_empty());
}

#[test]
fn legacy_import_reads_cells_and_prunes_dangling_links() {
    let json = r#"{
        "version": 3,
        "cells": [
            { "x": 0, "y": 0, "metal": { "placement": "r", "via": true },
              "silicon": { "kind": "n", "placement": "" } },
            { "x": 1, "y": 0, "metal": { "placement": "LU" } },
            { "x": 2, "y": 0, "silicon": { "kind": "npn", "placement": "LR",
              "gate": "U", "horizontal": true } }
        ],
        "modules": [ { "name": "clock", "anything": [1, 2, 3] } ]
    }"#;
    let buffer = import_legacy_json(json).unwrap();
    assert_eq!(buffer.cell_count(), 3);
    assert_eq!(
        buffer.cell(c(0, 0)),
        NormalizedCell::new(
            Metal::Trace {
                has_via: true,
                placement: p("R")
            },
            Silicon::np(true, Placement::CENTER)
        )
    );
    assert_eq!(buffer.cell(c(1, 0)).metal, Metal::trace(p("L")));
    assert_eq!(
        buffer.cell(c(2, 0)).si,
        Silicon::Mosfet {
            is_npn: true,
            is_horizontal: true,
            gate_placement: Placement::CENTER,
            ec_placement: Placement::CENTER,
        }
    );
    assert!(buffer.validate().is_empty());
}

#[test]
fn legacy_import_rejects_bad_cells() {
    let cell = |body: &str| format!(r#"{{ "cells": [ {{ "x": 0, "y": 0, {body} }} ] }}"#);

    assert!(matches!(
        Buffer::from_legacy_json(&cell(r#""silicon": { "kind": "q" }"#)),
        Err(LegacyImportError::UnknownKind { .. })
    ));
    assert!(matches!(
        Buffer::from_legacy_json(&cell(r#""metal": { "placement": "UX" }"#)),
        Err(LegacyImportError::Placement { .. })
    ));
    assert!(matches!(
        Buffer::from_legacy_json(&cell(
            r#""silicon": { "kind": "pnp", "gate": "L", "horizontal": true }"#
        )),
        Err(LegacyImportError::Unencodable(_))
    ));
    assert!(matches!(
        Buffer::from_legacy_json(r#"{ "cells": [ { "x": 1, "y": 1 }, { "x": 1, "y": 1 } ] }"#),
        Err(LegacyImportError::DuplicateCell(_))
    ));
    assert!(matches!(
        Buffer::from_legacy_json("{ cells: "),
        Err(LegacyImportError::Json(_))
    ));
}

#[test]
fn mask_tracks_existing_atoms() {
    let mut buffer = metal_row(0, 1);
    buffer.draw_via(c(1, 0));
    buffer.draw_si(c(1, 0), c(1, 1), true, true);

    let mut mask = Mask::new();
    mask.activate(&buffer, Atom::metal(c(0, 0))).unwrap();
    mask.activate_all(&buffer, [Atom::metal(c(1, 0)), Atom::si(c(1, 0))])
        .unwrap();
    assert_eq!(
        mask.activate(&buffer, Atom::si(c(0, 0))),
        Err(MaskError::MissingAtom(Atom::si(c(0, 0))))
    );
    assert_eq!(mask.active_count(), 3);
    assert!(mask.is_active(Atom::si(c(1, 0))));

    buffer.clear_cell_si(c(1, 0));
    mask.retain_valid(&buffer);
    assert_eq!(
        mask.active_atoms(),
        vec![Atom::metal(c(0, 0)), Atom::metal(c(1, 0))]
    );

    mask.deactivate(Atom::metal(c(0, 0)));
    assert!(!mask.touches(c(0, 0)));
    mask.clear();
    assert!(mask.is_empty());
}

#[test]
fn buffer_bounds_and_atoms() {
    let mut buffer = Buffer::new();
    assert_eq!(buffer.bounds(), None);
    buffer.draw_metal(c(-3, 2), c(4, -1), true);
    assert_eq!(buffer.bounds(), Some(Rect::from_sides(-3, -1, 4, 2)));
    assert_eq!(buffer.atoms_at(c(-3, 0)), vec![Atom::metal(c(-3, 0))]);
    assert!(buffer.atoms_at(c(0, 0)).is_empty());
}
