//! Failure safety under injected copy and move faults.
//!
//! Tests that own fixtures finish by dropping the array and checking that the
//! plan counts zero live values, so nothing leaked and nothing was destroyed
//! twice. The `panicking_*` tests do the same after catching an unwind.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tessera_array::{ArrayError, DynamicArray, Element, Guarantee, Relocation};
use tessera_test_utils::fixtures::{Brittle, Flaky, FlakyMoveOnly, Tracked};
use tessera_test_utils::{FaultKind, FaultPlan, InjectedFault};

fn values<M>(array: &DynamicArray<tessera_test_utils::Probe<M>>) -> Vec<Option<i64>> {
    array.iter().map(|p| p.value()).collect()
}

fn flaky(plan: &FaultPlan, n: i64) -> DynamicArray<Flaky> {
    let mut array = DynamicArray::new();
    for i in 1..=n {
        array.push_back(Flaky::new(plan, i)).unwrap();
    }
    array
}

fn move_only(plan: &FaultPlan, n: i64) -> DynamicArray<FlakyMoveOnly> {
    let mut array = DynamicArray::new();
    for i in 1..=n {
        array.push_back(FlakyMoveOnly::new(plan, i)).unwrap();
    }
    array
}

fn brittle(plan: &FaultPlan, n: i64) -> DynamicArray<Brittle> {
    let mut array = DynamicArray::new();
    for i in 1..=n {
        array.push_back(Brittle::new(plan, i)).unwrap();
    }
    array
}

fn brittle_values(array: &DynamicArray<Brittle>) -> Vec<Option<i64>> {
    array.iter().map(Brittle::value).collect()
}

fn guarantee_of<T: Element>() -> Guarantee {
    <T::Relocation as Relocation<T>>::GUARANTEE
}

#[test]
fn policies_report_their_guarantees() {
    assert_eq!(guarantee_of::<Tracked>(), Guarantee::NoThrow);
    assert_eq!(guarantee_of::<Flaky>(), Guarantee::Strong);
    assert_eq!(guarantee_of::<FlakyMoveOnly>(), Guarantee::Basic);
    assert_eq!(guarantee_of::<DynamicArray<Flaky>>(), Guarantee::NoThrow);
}

#[test]
fn growth_copies_instead_of_moving() {
    let plan = FaultPlan::new();
    let array = flaky(&plan, 5);
    assert_eq!(plan.moves(), 0);
    // Relocations at capacities 1, 2 and 4.
    assert_eq!(plan.copies(), 1 + 2 + 4);
    assert_eq!(plan.live(), 5);
    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn failed_copy_during_growth_leaves_array_unchanged() {
    let plan = FaultPlan::new();
    let mut array = flaky(&plan, 4);
    assert_eq!(array.capacity(), 4);
    let before = values(&array);

    // Moves and copies both fail on the third attempt from here.
    plan.fail_copy_after(2);
    plan.fail_move_after(2);
    let err = array
        .emplace_back(|| Ok(Flaky::new(&plan, 5)))
        .unwrap_err();

    assert_eq!(
        err,
        ArrayError::Element(InjectedFault {
            kind: FaultKind::Copy,
            at: plan.copies()
        })
    );
    assert_eq!(values(&array), before);
    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 4);
    assert_eq!(plan.live(), 4);

    // Once the fault has fired the array keeps working.
    plan.disarm();
    array.push_back(Flaky::new(&plan, 5)).unwrap();
    assert_eq!(values(&array), [1, 2, 3, 4, 5].map(Some));
    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn failing_moves_do_not_disturb_copying_growth() {
    let plan = FaultPlan::new();
    let mut array = flaky(&plan, 4);

    plan.fail_move_after(0);
    array.emplace_back(|| Ok(Flaky::new(&plan, 5))).unwrap();
    assert_eq!(values(&array), [1, 2, 3, 4, 5].map(Some));
    // The growth above never moved, so the fault is still waiting.
    assert!(plan.is_armed());
    assert_eq!(plan.moves(), 0);
}

#[test]
fn failed_reserve_is_strong_for_every_failing_copy() {
    for fail_at in 0..6 {
        let plan = FaultPlan::new();
        let mut array = flaky(&plan, 6);
        let before = values(&array);
        let capacity = array.capacity();

        plan.fail_copy_after(fail_at);
        assert!(array.reserve(100).is_err());
        assert_eq!(values(&array), before);
        assert_eq!(array.capacity(), capacity);
        assert_eq!(plan.live(), 6);

        drop(array);
        assert_eq!(plan.live(), 0);
    }
}

#[test]
fn failed_move_during_growth_abandons_contents() {
    let plan = FaultPlan::new();
    let mut array = move_only(&plan, 4);
    assert_eq!(array.capacity(), 4);

    plan.fail_move_after(1);
    let dropped = plan.dropped();
    let err = array.push_back(FlakyMoveOnly::new(&plan, 5)).unwrap_err();
    assert!(err.is_element());

    assert!(array.is_empty());
    assert_eq!(array.capacity(), 4);
    assert_eq!(plan.live(), 0);
    // One half-built destination, the four abandoned values and the value
    // that was never appended.
    assert_eq!(plan.dropped() - dropped, 6);

    // Still usable afterwards.
    array.push_back(FlakyMoveOnly::new(&plan, 7)).unwrap();
    assert_eq!(values(&array), [Some(7)]);
    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn shrink_to_fit_follows_the_same_policy() {
    let plan = FaultPlan::new();
    let mut array = move_only(&plan, 3);
    array.reserve(32).unwrap();

    plan.fail_move_after(0);
    assert!(array.shrink_to_fit().is_err());
    assert!(array.is_empty());
    assert_eq!(plan.live(), 0);
}

#[test]
fn failed_construction_leaves_array_untouched() {
    let plan = FaultPlan::new();
    let mut array = flaky(&plan, 4);
    let copies = plan.copies();

    let fault = InjectedFault {
        kind: FaultKind::Copy,
        at: 0,
    };
    assert_eq!(
        array.emplace_back(|| Err(fault)),
        Err(ArrayError::Element(fault))
    );
    // The buffer was full but nothing was relocated.
    assert_eq!(plan.copies(), copies);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.len(), 4);
}

#[test]
fn insert_shifts_with_moves() {
    let plan = FaultPlan::new();
    let mut array = flaky(&plan, 4);
    array.reserve(8).unwrap();
    let moves = plan.moves();

    array.insert(1, Flaky::new(&plan, 9)).unwrap();
    assert_eq!(values(&array), [1, 9, 2, 3, 4].map(Some));
    // One move-construct into the new slot, two move-assigns.
    assert_eq!(plan.moves() - moves, 3);

    array.erase(0).unwrap();
    assert_eq!(values(&array), [9, 2, 3, 4].map(Some));
    assert_eq!(plan.live(), 4);
    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn failed_insert_shift_keeps_every_value_owned() {
    let plan = FaultPlan::new();
    let mut array = move_only(&plan, 5);
    assert_eq!(array.capacity(), 8);

    plan.fail_move_after(1);
    assert!(array.insert(1, FlakyMoveOnly::new(&plan, 9)).is_err());

    // The last value was already carried into the new slot.
    assert_eq!(array.len(), 6);
    assert_eq!(plan.live(), array.len());
    let mut present: Vec<i64> = values(&array).into_iter().flatten().collect();
    present.sort();
    assert_eq!(present, vec![1, 2, 3, 4, 5]);

    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn failed_move_into_free_slot_leaves_insert_untouched() {
    let plan = FaultPlan::new();
    let mut array = move_only(&plan, 5);
    assert_eq!(array.capacity(), 8);
    let dropped = plan.dropped();

    plan.fail_move_after(0);
    let err = array.insert(1, FlakyMoveOnly::new(&plan, 9)).unwrap_err();
    assert_eq!(
        err,
        ArrayError::Element(InjectedFault {
            kind: FaultKind::Move,
            at: plan.moves()
        })
    );

    assert_eq!(array.len(), 5);
    assert_eq!(array.capacity(), 8);
    assert_eq!(values(&array), [1, 2, 3, 4, 5].map(Some));
    // Only the rejected value was destroyed.
    assert_eq!(plan.dropped() - dropped, 1);
    assert_eq!(plan.live(), 5);

    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn failed_erase_shift_keeps_length() {
    let plan = FaultPlan::new();
    let mut array = move_only(&plan, 5);

    plan.fail_move_after(1);
    assert!(array.erase(0).is_err());

    assert_eq!(array.len(), 5);
    assert_eq!(plan.live(), 5);
    let present: Vec<i64> = values(&array).into_iter().flatten().collect();
    assert_eq!(present, vec![2, 3, 4, 5]);

    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn failed_copy_of_whole_array_frees_partial_copy() {
    let plan = FaultPlan::new();
    let array = flaky(&plan, 5);

    plan.fail_copy_after(3);
    assert!(array.try_clone().is_err());
    assert_eq!(plan.live(), 5);

    let mut target = flaky(&plan, 2);
    plan.fail_copy_after(0);
    assert!(target.assign_from(&array).is_err());
    assert_eq!(values(&target), [1, 2].map(Some));
    assert_eq!(plan.live(), 7);

    plan.fail_copy_after(1);
    assert!(DynamicArray::from_elem(4, &array[0]).is_err());
    assert_eq!(plan.live(), 7);
}

#[test]
fn lifecycle_accounting_for_infallible_elements() {
    let plan = FaultPlan::new();
    {
        let mut array = DynamicArray::new();
        for i in 0..20 {
            array.push_back(Tracked::new(&plan, i)).unwrap();
        }
        assert_eq!(plan.live(), 20);

        array.truncate(15);
        assert_eq!(plan.live(), 15);

        let popped = array.pop_back();
        assert_eq!(popped.as_ref().map(Tracked::value), Some(14));
        drop(popped);
        assert_eq!(plan.live(), 14);

        array.erase(3).unwrap();
        array.insert(0, Tracked::new(&plan, 100)).unwrap();
        assert_eq!(plan.live(), 14);

        let copy = array.clone();
        assert_eq!(plan.live(), 28);
        drop(copy);

        array.resize_with(2, || unreachable!()).unwrap();
        assert_eq!(plan.live(), 2);

        let mut iter = array.into_iter();
        let _first = iter.next();
        drop(iter);
        assert_eq!(plan.live(), 1);
    }
    assert_eq!(plan.live(), 0);
    assert_eq!(plan.moves(), 0);
}

#[test]
fn nested_arrays_release_everything() {
    let plan = FaultPlan::new();
    {
        let mut outer = DynamicArray::new();
        for row in 0..4 {
            let mut inner = DynamicArray::new();
            for col in 0..row {
                inner.push_back(Tracked::new(&plan, col)).unwrap();
            }
            outer.push_back(inner).unwrap();
        }
        assert_eq!(plan.live(), 6);
        let copy = outer.try_clone().unwrap();
        assert_eq!(plan.live(), 12);
        outer.erase(3).unwrap();
        assert_eq!(plan.live(), 9);
        drop(copy);
    }
    assert_eq!(plan.live(), 0);
}

#[test]
fn panicking_copy_during_growth_leaves_array_unchanged() {
    let plan = FaultPlan::new();
    let mut array = brittle(&plan, 4);
    assert_eq!(array.capacity(), 4);
    let dropped = plan.dropped();

    plan.fail_copy_after(2);
    let outcome = catch_unwind(AssertUnwindSafe(|| array.reserve(16)));
    assert!(outcome.is_err());

    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 4);
    assert_eq!(brittle_values(&array), [1, 2, 3, 4].map(Some));
    assert_eq!(plan.live(), 4);
    // The two copies made before the panic were destroyed.
    assert_eq!(plan.dropped() - dropped, 2);

    array.reserve(16).unwrap();
    assert_eq!(array.capacity(), 16);
    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn panicking_constructor_keeps_values_built_so_far() {
    let plan = FaultPlan::new();
    let mut array = brittle(&plan, 2);
    let mut made = 0;

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        array.resize_with(6, || {
            made += 1;
            if made == 3 {
                panic!("constructor failed");
            }
            Ok(Brittle::new(&plan, 10 + made))
        })
    }));
    assert!(outcome.is_err());

    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 6);
    assert_eq!(brittle_values(&array), [1, 2, 11, 12].map(Some));
    assert_eq!(plan.live(), 4);

    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn panicking_destructor_during_truncate_drops_the_whole_tail() {
    let plan = FaultPlan::new();
    let mut array = brittle(&plan, 4);
    let dropped = plan.dropped();

    plan.panic_on_drop_of(3);
    let outcome = catch_unwind(AssertUnwindSafe(|| array.truncate(1)));
    assert!(outcome.is_err());
    assert!(!plan.is_armed());

    assert_eq!(array.len(), 1);
    assert_eq!(array.capacity(), 4);
    assert_eq!(brittle_values(&array), [Some(1)]);
    assert_eq!(plan.live(), 1);
    assert_eq!(plan.dropped() - dropped, 3);

    array.push_back(Brittle::new(&plan, 5)).unwrap();
    assert_eq!(brittle_values(&array), [1, 5].map(Some));
    drop(array);
    assert_eq!(plan.live(), 0);
}

#[test]
fn panicking_destructor_during_iterator_drop_releases_the_rest() {
    let plan = FaultPlan::new();
    let array = brittle(&plan, 4);

    let mut iter = array.into_iter();
    let first = iter.next();
    assert_eq!(first.as_ref().and_then(Brittle::value), Some(1));

    plan.panic_on_drop_of(3);
    let outcome = catch_unwind(AssertUnwindSafe(move || drop(iter)));
    assert!(outcome.is_err());

    // Values 2, 3 and 4 are gone; only the one taken out remains.
    assert_eq!(plan.live(), 1);
    drop(first);
    assert_eq!(plan.live(), 0);
}
