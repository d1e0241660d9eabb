use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cellbuf::{Atom, Buffer, CellPart};
use geometry::prelude::*;
use test_log::test;
use upc::{Metal, NormalizedCell, Placement, Silicon};

use crate::*;

fn c(x: i32, y: i32) -> CellCoord {
    CellCoord::new(x, y)
}

/// A P-channel MOSFET at (2, 0): P silicon runs vertically through it and
/// an N gate line runs horizontally from (0, 0) to (4, 0).
fn pnp_cross() -> Buffer {
    let mut buffer = Buffer::new();
    buffer.draw_si(c(2, -1), c(2, 1), true, false);
    buffer.draw_si(c(0, 0), c(4, 0), false, true);
    assert!(buffer.cell(c(2, 0)).si.is_mosfet());
    buffer
}

#[test]
fn metal_line_is_one_trace() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(0, 0), c(4, 0), false);
    buffer.draw_metal(c(0, 2), c(4, 2), false);

    let atoms = get_trace_atoms(&buffer, Atom::metal(c(2, 0)));
    assert_eq!(atoms.len(), 5);
    assert_eq!(atoms[0], Atom::metal(c(2, 0)));
    assert!(atoms.iter().all(|atom| atom.coord.y == 0));
}

#[test]
fn gate_is_isolated_from_the_channel() {
    let buffer = pnp_cross();

    let gate = get_trace_atoms(&buffer, Atom::si(c(0, 0)));
    assert_eq!(gate.len(), 5);
    assert!(gate.contains(&Atom::si(c(2, 0))));
    assert!(gate.contains(&Atom::si(c(4, 0))));
    assert!(!gate.iter().any(|atom| atom.coord.x == 2 && atom.coord.y != 0));

    let top = get_trace_atoms(&buffer, Atom::si(c(2, 1)));
    assert_eq!(
        top,
        vec![Atom::si(c(2, 1)), Atom::new(c(2, 0), CellPart::EcUpLeft)]
    );

    let bottom = get_trace_atoms(&buffer, Atom::new(c(2, 0), CellPart::EcDownRight));
    assert_eq!(
        bottom,
        vec![Atom::new(c(2, 0), CellPart::EcDownRight), Atom::si(c(2, -1))]
    );
}

#[test]
fn vias_join_metal_and_silicon() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(0, 0), c(2, 0), false);
    buffer.draw_si(c(2, 0), c(2, 2), true, true);
    assert_eq!(get_trace_atoms(&buffer, Atom::metal(c(0, 0))).len(), 3);

    buffer.draw_via(c(2, 0));
    let atoms = get_trace_atoms(&buffer, Atom::metal(c(0, 0)));
    assert_eq!(atoms.len(), 6);
    assert!(atoms.contains(&Atom::si(c(2, 2))));
}

#[test]
fn cycles_terminate() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(0, 0), c(2, 2), true);
    buffer.draw_metal(c(0, 0), c(2, 2), false);
    let atoms = get_trace_atoms(&buffer, Atom::metal(c(1, 2)));
    assert_eq!(atoms.len(), 8);
}

#[test]
fn missing_seed_yields_an_empty_trace() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(0, 0), c(1, 0), false);
    buffer.draw_si(c(5, 5), c(5, 6), true, true);

    assert!(get_trace_atoms(&buffer, Atom::si(c(0, 0))).is_empty());
    assert!(get_trace_atoms(&buffer, Atom::new(c(5, 5), CellPart::EcUpLeft)).is_empty());
    assert!(get_trace_atoms(&buffer, Atom::metal(c(9, 9))).is_empty());
}

#[test]
fn one_sided_links_do_not_conduct() {
    let mut buffer = Buffer::new();
    buffer.set_cell(
        c(0, 0),
        NormalizedCell::new(Metal::trace("R".parse().unwrap()), Silicon::None).denormalize(),
    );
    buffer.set_cell(
        c(1, 0),
        NormalizedCell::new(Metal::trace(Placement::CENTER), Silicon::None).denormalize(),
    );
    assert_eq!(get_trace_atoms(&buffer, Atom::metal(c(0, 0))).len(), 1);
    assert!(atom_neighbors(&buffer, Atom::metal(c(1, 0))).is_empty());
}

#[test]
fn traces_stop_at_the_grid_edge() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(i32::MAX - 1, 0), c(i32::MAX, 0), false);
    buffer.set_cell(
        c(i32::MAX, 5),
        NormalizedCell::new(
            Metal::trace("R".parse().unwrap()),
            Silicon::np(true, "R".parse().unwrap()),
        )
        .denormalize(),
    );

    let atoms = get_trace_atoms(&buffer, Atom::metal(c(i32::MAX, 0)));
    assert_eq!(atoms, vec![Atom::metal(c(i32::MAX, 0)), Atom::metal(c(i32::MAX - 1, 0))]);
    assert_eq!(get_trace_atoms(&buffer, Atom::metal(c(i32::MAX, 5))).len(), 1);
    assert_eq!(get_trace_atoms(&buffer, Atom::si(c(i32::MAX, 5))).len(), 1);
    assert_eq!(extract_all_traces(&buffer).len(), 3);
}

#[test]
fn extract_all_traces_partitions_every_atom() {
    let buffer = pnp_cross();
    let traces = extract_all_traces(&buffer);

    assert_eq!(traces.len(), 3);
    assert_eq!(traces.iter().map(|(_, atoms)| atoms.len()).sum::<usize>(), 9);
    assert_eq!(traces.net_of(Atom::si(c(0, 0))).map(|id| id.index()), Some(0));
    assert!(traces.connected(Atom::si(c(0, 0)), Atom::si(c(4, 0))));
    assert!(!traces.connected(Atom::si(c(2, 1)), Atom::si(c(2, -1))));
    assert!(!traces.connected(Atom::si(c(2, 1)), Atom::si(c(2, 0))));
    assert_eq!(
        traces
            .trace_of(Atom::new(c(2, 0), CellPart::EcUpLeft))
            .map(|atoms| atoms.len()),
        Some(2)
    );
    assert_eq!(traces.trace_of(Atom::metal(c(0, 0))), None);
}

#[test]
fn socket_pins_resolve_to_atoms() {
    let mut buffer = Buffer::new();
    buffer.draw_metal(c(0, 0), c(1, 0), false);
    buffer.draw_si(c(0, 3), c(0, 3), true, false);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut socket = Socket::new(
        vec![Pin::trigger(c(0, 0)), Pin::new(c(0, 3)), Pin::new(c(7, 7))],
        move |pins| {
            counter.fetch_add(1, Ordering::SeqCst);
            for pin in pins.iter_mut() {
                pin.output_high = pin.input_high;
            }
        },
    );
    assert_eq!(
        socket.pin_atoms(&buffer),
        vec![Some(Atom::metal(c(0, 0))), Some(Atom::si(c(0, 3))), None]
    );

    socket.pins_mut()[1].input_high = true;
    socket.notify();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(socket.pins()[1].output_high);
    assert!(!socket.pins()[0].output_high);
}
