//! AFL fuzz harness for rank generation
//!
//! Drives a list through random edits and checks after every step that
//! the list is strictly sorted, every value fits the length cap, and
//! every rank survives a trip through its wire form. Also feeds raw
//! bytes to the parser, which must never panic.

use afl::fuzz;
use lexorank::Bucket;
use lexorank::MAX_LENGTH;
use lexorank::Rank;
use lexorank::RankError;
use lexorank::rebalance;

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    /// Insert between the neighbors at a fractional list position
    Insert { pos_frac: u8 },
    /// Append after the last item
    Append,
    /// Prepend before the first item
    Prepend,
    /// Step from an existing item with next() or previous()
    Step { pos_frac: u8, forward: bool },
    /// Rewrite the whole list into a bucket
    Rebalance { bucket: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.is_empty() {
            return None;
        }

        let op_type = bytes[0] % 5;
        let rest = &bytes[1..];

        match op_type {
            0 if !rest.is_empty() => Some((FuzzOp::Insert { pos_frac: rest[0] }, &rest[1..])),
            1 => Some((FuzzOp::Append, rest)),
            2 => Some((FuzzOp::Prepend, rest)),
            3 if rest.len() >= 2 => {
                let op = FuzzOp::Step {
                    pos_frac: rest[0],
                    forward: rest[1] % 2 == 0,
                };
                Some((op, &rest[2..]))
            }
            4 if !rest.is_empty() => Some((FuzzOp::Rebalance { bucket: rest[0] }, &rest[1..])),
            _ => None,
        }
    }
}

fn position(pos_frac: u8, len: usize) -> usize {
    return (pos_frac as usize * (len + 1)) / 256;
}

fn check(list: &[Rank]) {
    for pair in list.windows(2) {
        assert!(pair[0] < pair[1], "list out of order: {:?} !< {:?}", pair[0], pair[1]);
        assert_eq!(pair[0].bucket(), pair[1].bucket(), "mixed buckets");
    }
    for rank in list {
        assert!(rank.len() <= MAX_LENGTH, "value too long: {}", rank.len());
        let wire = rank.to_string();
        assert_eq!(Rank::parse(&wire).as_ref(), Ok(rank), "wire round trip failed: {wire}");
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        // The parser must reject or accept arbitrary text without panicking.
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(rank) = Rank::parse(text) {
                assert_eq!(rank.to_string(), text);
            }
        }

        let mut list: Vec<Rank> = Vec::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;

            match op {
                FuzzOp::Insert { pos_frac } => {
                    let index = position(pos_frac, list.len());
                    let prev = index.checked_sub(1).map(|i| &list[i]);
                    let next = list.get(index);
                    match Rank::generate_between(prev, next) {
                        Ok(rank) => list.insert(index, rank),
                        Err(RankError::Exhausted) => list = rebalance(&list, list[0].bucket().next()),
                        Err(err) => panic!("unexpected error: {err}"),
                    }
                }
                FuzzOp::Append => {
                    let rank = match list.last() {
                        Some(last) => last.next(),
                        None => Rank::initial(),
                    };
                    if list.last() != Some(&rank) {
                        list.push(rank);
                    }
                }
                FuzzOp::Prepend => {
                    let rank = match list.first() {
                        Some(first) => first.previous(),
                        None => Rank::initial(),
                    };
                    if list.first() != Some(&rank) {
                        list.insert(0, rank);
                    }
                }
                FuzzOp::Step { pos_frac, forward } => {
                    if list.is_empty() {
                        continue;
                    }
                    let index = position(pos_frac, list.len() - 1);
                    let rank = &list[index];
                    if forward {
                        let next = rank.next();
                        assert!(next >= *rank);
                        if next == *rank {
                            assert!(rank.value().is_max());
                        }
                    } else {
                        let previous = rank.previous();
                        assert!(previous <= *rank);
                        if previous == *rank {
                            assert!(rank.value().is_min());
                        }
                    }
                }
                FuzzOp::Rebalance { bucket } => {
                    let bucket = Bucket::from_index(bucket);
                    let fresh = rebalance(&list, bucket);
                    assert_eq!(fresh.len(), list.len());
                    assert!(fresh.iter().all(|r| r.bucket() == bucket));
                    list = fresh;
                }
            }

            check(&list);
        }
    });
}
