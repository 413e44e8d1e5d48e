//! Frame Encoder Unit Tests.
//!
//! The encoder may only change its level on ticks that are multiples of the
//! baud interval, and reports the frame column it is driving.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use uartbench_core::serial::{ByteVector, FrameEncoder, TxPosition, TxState};

#[test]
fn idle_encoder_drives_high() {
    let mut tx = FrameEncoder::new(8, 1);
    for _ in 0..20 {
        assert!(tx.step().level);
    }
    assert!(tx.is_done());
}

#[test]
fn frame_occupies_ten_bits_plus_gap() {
    let baud = 4;
    let mut tx = FrameEncoder::new(baud, 1);
    tx.enqueue([ByteVector::from_byte(0x47), ByteVector::from_byte(0x47)]);
    let levels: Vec<bool> = (0..11 * baud).map(|_| tx.step().level).collect();
    let bits: Vec<bool> = levels.chunks(baud as usize).map(|c| c[0]).collect();
    let mut want = ByteVector::from_byte(0x47).wire_levels().to_vec();
    want.push(true);
    assert_eq!(bits, want);
    // The second frame starts on the next boundary.
    assert!(!tx.step().level);
}

#[test]
fn positions_follow_columns() {
    let mut tx = FrameEncoder::new(1, 0);
    tx.enqueue([ByteVector::from_byte(0), ByteVector::from_byte(0)]);
    let _ = tx.step();
    assert_eq!(tx.position(), TxPosition { row: 0, column: Some(0) });
    for _ in 0..9 {
        let _ = tx.step();
    }
    assert_eq!(tx.state(), TxState::Stop);
    assert_eq!(tx.position(), TxPosition { row: 0, column: Some(9) });
    let _ = tx.step();
    assert_eq!(tx.position(), TxPosition { row: 1, column: Some(0) });
}

#[test]
fn gap_has_no_column() {
    let mut tx = FrameEncoder::new(1, 2);
    tx.enqueue([ByteVector::from_byte(0)]);
    for _ in 0..11 {
        let _ = tx.step();
    }
    assert_eq!(tx.state(), TxState::Gap(1));
    assert_eq!(tx.position().column, None);
    assert_eq!(tx.position().row, 1);
}

proptest! {
    #[test]
    fn level_changes_only_on_boundaries(
        bytes in proptest::collection::vec(any::<u8>(), 1..4),
        baud in 2u32..24,
        gap in 0u32..3,
    ) {
        let mut tx = FrameEncoder::new(baud, gap);
        tx.enqueue(bytes.iter().copied().map(ByteVector::from_byte));
        let mut previous = true;
        for tick in 0..u64::from(baud) * 13 * 4 {
            let step = tx.step();
            prop_assert_eq!(step.boundary, tick % u64::from(baud) == 0);
            if step.level != previous {
                prop_assert!(step.boundary, "level changed at tick {}", tick);
            }
            previous = step.level;
        }
        prop_assert!(tx.is_done());
        prop_assert_eq!(tx.frames_sent(), bytes.len());
    }
}
