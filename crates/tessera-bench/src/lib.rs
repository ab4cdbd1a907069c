//! Benchmark workloads for the Tessera containers.
//!
//! - [`Ticket`]: an element type with a fallible copy and move, relocated
//!   with [`CopyOnGrow`], so growth pays for the strong guarantee.
//! - [`MovableTicket`]: the same payload relocated with [`MoveOrAbandon`].
//! - [`scrambled`]: a deterministic value sequence for sort and insert
//!   workloads.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::convert::Infallible;

use tessera_array::{CopyOnGrow, Element, MoveOrAbandon, TryClone, TryMove};

/// A heap-owning value whose copy and move go through the fallible traits.
///
/// Neither ever fails; the point is to measure the policy, not the fault.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    pub label: String,
}

impl Element for Ticket {
    type Error = Infallible;
    type Relocation = CopyOnGrow;
}

impl TryMove for Ticket {
    fn try_move_from(src: &mut Self) -> Result<Self, Self::Error> {
        Ok(Self {
            label: std::mem::take(&mut src.label),
        })
    }
}

impl TryClone for Ticket {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        Ok(self.clone())
    }
}

/// [`Ticket`] relocated by moving instead of copying.
#[derive(Debug, Default, PartialEq)]
pub struct MovableTicket {
    pub label: String,
}

impl Element for MovableTicket {
    type Error = Infallible;
    type Relocation = MoveOrAbandon;
}

impl TryMove for MovableTicket {
    fn try_move_from(src: &mut Self) -> Result<Self, Self::Error> {
        Ok(Self {
            label: std::mem::take(&mut src.label),
        })
    }
}

/// `n` values in a fixed, scrambled order.
///
/// A multiplicative hash of the index; the same `n` always gives the same
/// sequence.
pub fn scrambled(n: usize) -> Vec<u64> {
    (0..n as u64)
        .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32)
        .collect()
}

/// `n` tickets with distinct, non-empty labels.
pub fn tickets(n: usize) -> Vec<Ticket> {
    (0..n)
        .map(|i| Ticket {
            label: format!("ticket-{i:06}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_array::DynamicArray;

    #[test]
    fn scrambled_is_deterministic() {
        assert_eq!(scrambled(64), scrambled(64));
        assert_eq!(scrambled(64).len(), 64);
    }

    #[test]
    fn tickets_survive_growth() {
        let mut array = DynamicArray::new();
        for ticket in tickets(33) {
            array.push_back(ticket).unwrap();
        }
        assert_eq!(array.as_slice(), tickets(33).as_slice());
    }

    #[test]
    fn movable_tickets_survive_growth() {
        let mut array = DynamicArray::new();
        for i in 0..33 {
            array
                .push_back(MovableTicket {
                    label: i.to_string(),
                })
                .unwrap();
        }
        assert_eq!(array.len(), 33);
        assert_eq!(array[32].label, "32");
    }
}
