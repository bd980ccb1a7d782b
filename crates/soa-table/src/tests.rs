//! Unit tests for soa-table.

#[cfg(test)]
mod column {
    use crate::column::Column;

    #[test]
    fn append_returns_previous_len() {
        let mut col = Column::new();
        assert_eq!(col.append(10), 0);
        assert_eq!(col.append(20), 1);
        assert_eq!(col.len(), 2);
        assert_eq!(*col.get(1), 20);
    }

    #[test]
    fn reserve_keeps_len_and_values() {
        let mut col = Column::new();
        col.append("a".to_string());
        col.reserve(64);
        assert!(col.capacity() >= 64);
        assert_eq!(col.len(), 1);
        assert_eq!(col.get(0), "a");
    }

    #[test]
    fn reserve_smaller_is_noop() {
        let mut col: Column<u8> = Column::new();
        col.reserve(16);
        let cap = col.capacity();
        col.reserve(4);
        assert_eq!(col.capacity(), cap);
    }

    #[test]
    fn erase_swaps_last_in() {
        let mut col = Column::new();
        for v in [1, 2, 3, 4] {
            col.append(v);
        }
        assert_eq!(col.erase(1), 2);
        assert_eq!(col.as_slice(), &[1, 4, 3]);
    }

    #[test]
    fn set_returns_old_value() {
        let mut col = Column::new();
        col.append(1.5_f64);
        assert_eq!(col.set(0, 2.5), 1.5);
        assert_eq!(*col.get(0), 2.5);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut col = Column::new();
        col.reserve(8);
        col.append(1u32);
        let cap = col.capacity();
        col.clear();
        assert_eq!(col.len(), 0);
        assert_eq!(col.capacity(), cap);
    }

    #[test]
    fn clone_preserves_capacity() {
        let mut col = Column::new();
        col.reserve(32);
        col.append(7u16);
        let copy = col.clone();
        assert!(copy.capacity() >= 32);
        assert_eq!(copy.as_slice(), &[7]);
    }
}

#[cfg(test)]
mod index {
    use soa_core::RowId;

    use crate::index::Index;

    fn index_with_capacity(capacity: usize) -> Index {
        let mut index = Index::default();
        index.grow(capacity);
        index
    }

    #[test]
    fn single_id() {
        let mut index = index_with_capacity(1);
        let id = index.push();
        assert_eq!(id.generation(), 2);
        assert_eq!(id.slot(), 0);

        assert_eq!(index.position(id), Some(0));
        assert_eq!(index.remove(id), Some(0));
        assert_eq!(index.remove(id), None);
        assert_eq!(index.remove(id), None);
        assert_eq!(index.position(id), None);
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut index = index_with_capacity(3);
        let fst = index.push();
        let sec = index.push();
        let thd = index.push();

        assert_eq!(index.position(fst), Some(0));
        assert_eq!(index.position(sec), Some(1));
        assert_eq!(index.position(thd), Some(2));

        assert_eq!(index.remove(sec), Some(1));
        assert_eq!(index.remove(sec), None);
        assert_eq!(index.len(), 2);

        // The last row moved into the hole.
        assert_eq!(index.position(fst), Some(0));
        assert_eq!(index.position(sec), None);
        assert_eq!(index.position(thd), Some(1));

        let sec2 = index.push();
        assert!(sec2.generation() > sec.generation());
        assert_eq!(sec2.slot(), sec.slot());
        assert_eq!(index.position(sec2), Some(2));

        assert_eq!(index.remove(fst), Some(0));
        assert_eq!(index.position(fst), None);
        assert_eq!(index.position(sec2), Some(0));
        assert_eq!(index.position(thd), Some(1));

        let fst2 = index.push();
        assert!(fst2.generation() > fst.generation());
        assert_eq!(fst2.slot(), fst.slot());
        assert_eq!(index.position(fst2), Some(2));
    }

    #[test]
    fn refill_recycles_most_recent_first() {
        let mut index = index_with_capacity(3);
        let ids = [index.push(), index.push(), index.push()];
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.generation(), 2);
            assert_eq!(id.slot_index(), i);
            assert!(index.remove(*id).is_some());
        }

        index.grow(5);
        let ids: Vec<RowId> = (0..5).map(|_| index.push()).collect();
        let slots = [2, 1, 0, 3, 4];
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.generation(), if i < 3 { 4 } else { 2 });
            assert_eq!(id.slot(), slots[i]);
            assert_eq!(index.position(*id), Some(i));
        }
    }

    #[test]
    fn clear_invalidates_every_id() {
        let mut index = index_with_capacity(4);
        let ids: Vec<RowId> = (0..4).map(|_| index.push()).collect();
        index.clear();
        assert_eq!(index.len(), 0);
        assert_eq!(index.capacity(), 4);
        for id in ids {
            assert_eq!(index.position(id), None);
        }
    }

    #[test]
    fn vacant_and_foreign_ids_never_resolve() {
        let index = index_with_capacity(2);
        assert_eq!(index.position(RowId::vacant(0)), None);
        assert_eq!(index.position(RowId::INVALID), None);
        assert_eq!(index.position(RowId::new(99, 2)), None);
    }

    #[test]
    #[should_panic(expected = "no spare capacity")]
    fn push_without_capacity_panics() {
        let mut index = Index::default();
        index.push();
    }
}

#[cfg(test)]
mod table {
    use crate::{Table, TableError};

    #[test]
    fn base() {
        let mut table: Table<(i32, f64, bool)> = Table::new();
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), 0);
        assert_eq!(table.arity(), 3);

        let fst = table.insert((1, 0.1, true));
        let sec = table.insert((2, 0.2, false));
        let _thd = table.insert((3, 0.3, false));

        assert_eq!(table.len(), 3);
        assert_eq!(table.capacity(), 4);

        assert_eq!(table.column::<0>(), &[1, 2, 3]);
        assert_eq!(table.column::<1>(), &[0.1, 0.2, 0.3]);
        assert_eq!(table.column::<2>(), &[true, false, false]);

        assert!(table.remove(fst).is_some());
        assert!(table.remove(sec).is_some());
        assert_eq!(table.len(), 1);

        table.insert((4, 0.4, true));
        // Swap-erase does not keep insertion order.
        assert_eq!(table.column::<0>(), &[3, 4]);
        assert_eq!(table.column::<1>(), &[0.3, 0.4]);
        assert_eq!(table.column::<2>(), &[false, true]);
    }

    #[test]
    fn strings() {
        let mut table: Table<(i32, String)> = Table::new();
        table.insert((1, "kek".into()));
        let lol = table.insert((2, "lol".into()));
        table.insert((3, "three".into()));
        table.insert((4, "four".into()));

        assert_eq!(table.column::<0>(), &[1, 2, 3, 4]);
        assert_eq!(table.column::<1>(), &["kek", "lol", "three", "four"]);

        assert_eq!(table.remove(lol), Some((2, "lol".to_string())));

        assert_eq!(table.column::<0>(), &[1, 4, 3]);
        assert_eq!(table.column::<1>(), &["kek", "four", "three"]);
    }

    #[test]
    fn emplace_returns_previous_len() {
        let mut table: Table<(u8,)> = Table::new();
        assert_eq!(table.emplace_row((9,)), 0);
        assert_eq!(table.emplace_row((8,)), 1);
        assert_eq!(table.emplace_row((7,)), 2);
    }

    #[test]
    fn round_trip_through_view() {
        let mut table: Table<(u32, &str, f32)> = Table::new();
        let index = table.emplace_row((42, "x", 2.5));
        let row = table.at(index).unwrap();
        assert_eq!(row.get(), (&42, &"x", &2.5));
        assert_eq!(*row.field::<0>(), 42);
        assert_eq!(*row.field::<1>(), "x");
        assert_eq!(*row.field::<2>(), 2.5);
    }

    #[test]
    fn scenario_erase_first_of_three() {
        let mut table: Table<(i32, &str)> = Table::new();
        table.emplace_row((1, "a"));
        table.emplace_row((2, "b"));
        table.emplace_row((3, "c"));
        assert_eq!(table.len(), 3);

        assert_eq!(table.erase_row(0), Ok((1, "a")));
        assert_eq!(table.len(), 2);
        // Swap-erase: the former last row now sits at index 0.
        assert_eq!(table.at(0).unwrap().get(), (&3, &"c"));
        assert_eq!(table.at(1).unwrap().get(), (&2, &"b"));
        assert!(table.at(2).is_err());
    }

    #[test]
    fn erase_last_row_just_shrinks() {
        let mut table: Table<(i32,)> = [(1,), (2,), (3,)].into_iter().collect();
        assert_eq!(table.erase_row(2), Ok((3,)));
        assert_eq!(table.column::<0>(), &[1, 2]);
    }

    #[test]
    fn erase_leaves_lower_rows_alone() {
        let mut table: Table<(usize, usize)> = (0..10).map(|i| (i, i * 10)).collect();
        table.erase_row(6).unwrap();
        for i in 0..6 {
            assert_eq!(table.at(i).unwrap().get(), (&i, &(i * 10)));
        }
        assert_eq!(table.at(6).unwrap().get(), (&9, &90));
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn out_of_range_is_reported_with_context() {
        let mut table: Table<(u8, u8)> = Table::new();
        table.emplace_row((1, 2));
        let len = table.len();

        assert_eq!(
            table.at(len).unwrap_err(),
            TableError::RowOutOfRange { index: 1, len: 1 }
        );
        assert!(table.at(usize::MAX).is_err());
        assert!(table.at_mut(5).is_err());
        assert!(table.id_at(1).is_err());
        assert_eq!(
            table.erase_row(3),
            Err(TableError::RowOutOfRange { index: 3, len: 1 })
        );
        assert!(table.set_row(1, (0, 0)).is_err());
        // Failed calls change nothing.
        assert_eq!(table.len(), 1);
        assert_eq!(table.column::<1>(), &[2]);
    }

    #[test]
    fn empty_table_has_no_rows() {
        let mut table: Table<(u8,)> = Table::default();
        assert!(table.is_empty());
        assert!(table.at(0).is_err());
        assert!(table.erase_row(0).is_err());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn growth_keeps_values_in_order() {
        let mut table: Table<(u64, String)> = Table::new();
        const N: u64 = 1_000;
        for i in 0..N {
            table.emplace_row((i, i.to_string()));
        }
        assert!(table.capacity() >= N as usize);
        assert_eq!(table.len(), N as usize);
        for (i, row) in table.iter().enumerate() {
            assert_eq!(*row.field::<0>(), i as u64);
            assert_eq!(row.field::<1>(), &i.to_string());
        }
    }

    #[test]
    fn growth_reallocates_logarithmically() {
        let mut table: Table<(u32, u8)> = Table::new();
        let mut growths = 0;
        let mut cap = table.capacity();
        for i in 0..10_000 {
            table.emplace_row((i, 0));
            if table.capacity() != cap {
                growths += 1;
                cap = table.capacity();
            }
        }
        // 1, 2, 4, … 16384.
        assert_eq!(growths, 15);
    }

    #[test]
    fn reserve_then_fill_never_reallocates() {
        let mut table: Table<(u32, String)> = Table::new();
        table.reserve(100);
        assert_eq!(table.capacity(), 100);
        let ints = table.column::<0>().as_ptr();
        let strings = table.column::<1>().as_ptr();

        for i in 0..100 {
            table.emplace_row((i, String::new()));
            assert_eq!(table.capacity(), 100);
        }
        assert_eq!(table.column::<0>().as_ptr(), ints);
        assert_eq!(table.column::<1>().as_ptr(), strings);

        table.emplace_row((100, String::new()));
        assert_eq!(table.capacity(), 200);
    }

    #[test]
    fn reserve_smaller_is_noop() {
        let mut table: Table<(u8,)> = Table::with_capacity(10);
        table.reserve(3);
        assert_eq!(table.capacity(), 10);
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum")]
    fn reserve_past_max_rows_panics() {
        let mut table: Table<((),)> = Table::new();
        table.reserve(crate::MAX_ROWS + 1);
    }

    #[test]
    fn zero_sized_fields() {
        let mut table: Table<((), u8)> = Table::new();
        table.emplace_row(((), 1));
        table.emplace_row(((), 2));
        assert_eq!(table.column::<0>().len(), 2);
        assert_eq!(table.erase_row(0), Ok(((), 1)));
        assert_eq!(table.column::<1>(), &[2]);
    }

    #[test]
    fn repeated_field_types_are_positional() {
        let mut table: Table<(f64, f64)> = Table::new();
        table.emplace_row((1.0, -1.0));
        assert_eq!(table.column::<0>(), &[1.0]);
        assert_eq!(table.column::<1>(), &[-1.0]);
    }

    #[test]
    fn clear_keeps_capacity_and_kills_ids() {
        let mut table: Table<(u8, char)> = Table::new();
        let id = table.insert((1, 'a'));
        table.insert((2, 'b'));
        let cap = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), cap);
        assert!(!table.contains(id));

        let fresh = table.insert((3, 'c'));
        assert_ne!(fresh, id);
        assert_eq!(table.get(fresh).unwrap().get(), (&3, &'c'));
    }

    #[test]
    fn set_row_returns_previous_values() {
        let mut table: Table<(u8, String)> = Table::new();
        table.emplace_row((1, "one".into()));
        let old = table.set_row(0, (2, "two".into())).unwrap();
        assert_eq!(old, (1, "one".to_string()));
        assert_eq!(table.at(0).unwrap().get(), (&2, &"two".to_string()));
    }

    #[test]
    fn column_mut_writes_in_place() {
        let mut table: Table<(i32, i32)> = (0..4).map(|i| (i, 0)).collect();
        for v in table.column_mut::<1>() {
            *v = 7;
        }
        assert_eq!(table.column::<1>(), &[7, 7, 7, 7]);
        assert_eq!(table.column::<0>(), &[0, 1, 2, 3]);
    }

    #[test]
    fn columns_mut_gives_disjoint_slices() {
        let mut table: Table<(f32, f32, u8)> = Table::new();
        table.emplace_row((0.0, 1.0, 0));
        table.emplace_row((10.0, -2.0, 0));
        let (pos, vel, _) = table.columns_mut();
        for (p, v) in pos.iter_mut().zip(vel.iter()) {
            *p += *v;
        }
        let (pos, _, _) = table.columns();
        assert_eq!(pos, &[1.0, 8.0]);
    }

    #[test]
    fn column_with_ids_pairs_rows() {
        let mut table: Table<(u8, u8)> = Table::new();
        let a = table.insert((1, 10));
        let b = table.insert((2, 20));
        let pairs: Vec<_> = table.column_with_ids::<1>().collect();
        assert_eq!(pairs, vec![(a, &10), (b, &20)]);
    }

    #[test]
    fn extend_reserves_up_front() {
        let mut table: Table<(u16,)> = Table::new();
        table.extend((0..50).map(|i| (i,)));
        assert_eq!(table.len(), 50);
        assert_eq!(table.capacity(), 50);
    }

    #[test]
    fn clone_is_deep_and_keeps_capacity() {
        let mut table: Table<(u8, String)> = Table::with_capacity(16);
        let id = table.insert((1, "a".into()));
        let mut copy = table.clone();
        assert_eq!(copy.capacity(), 16);
        copy.get_mut(id).unwrap().field_mut::<1>().push('!');
        assert_eq!(table.get(id).unwrap().field::<1>(), "a");
        assert_eq!(copy.get(id).unwrap().field::<1>(), "a!");
    }

    #[test]
    fn send_and_sync_follow_field_types() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Table<(u32, String, Vec<f64>)>>();
        assert_send_sync::<crate::RowRef<'static, (u32, String)>>();
    }

    #[test]
    fn debug_reports_shape() {
        let table: Table<(u8, u8)> = Table::with_capacity(4);
        assert_eq!(
            format!("{table:?}"),
            "Table { arity: 2, len: 0, capacity: 4 }"
        );
    }
}

#[cfg(test)]
mod ids {
    use crate::{RowId, Table, TableError};

    #[test]
    fn id_follows_row_across_swap_erase() {
        let mut table: Table<(u32, char)> = Table::new();
        let a = table.insert((1, 'a'));
        let _b = table.insert((2, 'b'));
        let c = table.insert((3, 'c'));

        assert_eq!(table.position(c), Ok(2));
        table.remove(a).unwrap();
        assert_eq!(table.position(c), Ok(0));
        assert_eq!(table.get(c).unwrap().get(), (&3, &'c'));
        assert_eq!(table.ids()[0], c);
    }

    #[test]
    fn stale_id_is_rejected() {
        let mut table: Table<(u32,)> = Table::new();
        let a = table.insert((1,));
        assert_eq!(table.remove(a), Some((1,)));
        assert_eq!(table.remove(a), None);
        assert!(!table.contains(a));
        assert!(table.get(a).is_none());
        assert_eq!(table.position(a), Err(TableError::StaleId(a)));

        // The slot is recycled under a new generation.
        let b = table.insert((2,));
        assert_eq!(b.slot(), a.slot());
        assert_ne!(b, a);
        assert!(table.get(a).is_none());
    }

    #[test]
    fn erase_by_index_invalidates_that_rows_id() {
        let mut table: Table<(u32,)> = Table::new();
        let a = table.insert((1,));
        let b = table.insert((2,));
        table.erase_row(0).unwrap();
        assert!(!table.contains(a));
        assert_eq!(table.position(b), Ok(0));
    }

    #[test]
    fn id_at_matches_view_id() {
        let mut table: Table<(u8,)> = Table::new();
        let id = table.insert((5,));
        assert_eq!(table.id_at(0), Ok(id));
        assert_eq!(table.at(0).unwrap().id(), id);
        assert_eq!(table.at_mut(0).unwrap().id(), id);
    }

    #[test]
    fn invalid_sentinel_never_resolves() {
        let mut table: Table<(u8,)> = Table::new();
        table.insert((1,));
        assert!(!table.contains(RowId::INVALID));
        assert!(table.remove(RowId::INVALID).is_none());
        assert_eq!(table.len(), 1);
    }
}

#[cfg(test)]
mod views {
    use crate::Table;

    #[test]
    fn row_mut_writes_single_field() {
        let mut table: Table<(u32, String)> = Table::new();
        table.emplace_row((1, "a".into()));
        {
            let mut row = table.at_mut(0).unwrap();
            *row.field_mut::<0>() += 10;
            assert_eq!(row.set_field::<1>("b".into()), "a");
            assert_eq!(row.index(), 0);
        }
        assert_eq!(table.at(0).unwrap().get(), (&11, &"b".to_string()));
    }

    #[test]
    fn row_mut_get_mut_touches_all_fields() {
        let mut table: Table<(i32, i32, i32)> = Table::new();
        table.emplace_row((1, 2, 3));
        let mut row = table.at_mut(0).unwrap();
        let (a, b, c) = row.get_mut();
        std::mem::swap(a, c);
        *b *= 10;
        assert_eq!(row.get(), (&3, &20, &1));
        assert_eq!(row.as_row_ref().field::<2>(), &1);
    }

    #[test]
    fn row_mut_replace_and_into_mut() {
        let mut table: Table<(u8, char)> = Table::new();
        let id = table.insert((1, 'x'));
        let mut row = table.get_mut(id).unwrap();
        assert_eq!(row.replace((2, 'y')), (1, 'x'));
        let (n, _) = row.into_mut();
        *n = 3;
        assert_eq!(table.column::<0>(), &[3]);
    }

    #[test]
    fn row_ref_is_copy_and_debug() {
        let mut table: Table<(u8, &str)> = Table::new();
        table.emplace_row((4, "four"));
        let row = table.at(0).unwrap();
        let copy = row;
        assert_eq!(row.field::<1>(), copy.field::<1>());
        assert_eq!(
            format!("{row:?}"),
            r#"RowRef { index: 0, fields: (4, "four") }"#
        );
    }
}

#[cfg(test)]
mod iteration {
    use crate::Table;

    fn sample() -> Table<(u32, char)> {
        ['a', 'b', 'c', 'd', 'e']
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as u32, c))
            .collect()
    }

    #[test]
    fn forward_visits_every_row_in_order() {
        let table = sample();
        let seen: Vec<_> = table.iter().map(|r| (r.index(), *r.field::<1>())).collect();
        assert_eq!(
            seen,
            vec![(0, 'a'), (1, 'b'), (2, 'c'), (3, 'd'), (4, 'e')]
        );
    }

    #[test]
    fn restartable_by_clone() {
        let table = sample();
        let mut rows = table.iter();
        rows.next();
        let snapshot = rows.clone();
        assert_eq!(rows.count(), 4);
        assert_eq!(snapshot.map(|r| *r.field::<0>()).sum::<u32>(), 1 + 2 + 3 + 4);
        assert_eq!(table.iter().len(), 5);
    }

    #[test]
    fn random_access_with_nth() {
        let table = sample();
        let mut rows = table.iter();
        assert_eq!(*rows.nth(3).unwrap().field::<1>(), 'd');
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.remaining(), 4..5);
        assert!(rows.nth(5).is_none());
        assert!(rows.next().is_none());
    }

    #[test]
    fn reverse_and_nth_back() {
        let table = sample();
        let rev: String = table.iter().rev().map(|r| *r.field::<1>()).collect();
        assert_eq!(rev, "edcba");
        let mut rows = table.iter();
        assert_eq!(*rows.nth_back(1).unwrap().field::<1>(), 'd');
        assert_eq!(*rows.last().unwrap().field::<1>(), 'c');
    }

    #[test]
    fn for_loop_over_reference() {
        let table = sample();
        let mut n = 0;
        for row in &table {
            assert_eq!(row.id(), table.ids()[row.index()]);
            n += 1;
        }
        assert_eq!(n, table.len());
    }

    #[test]
    fn iter_mut_updates_all_fields() {
        let mut table = sample();
        for (n, c) in &mut table {
            *n *= 2;
            *c = c.to_ascii_uppercase();
        }
        assert_eq!(table.column::<0>(), &[0, 2, 4, 6, 8]);
        assert_eq!(table.column::<1>(), &['A', 'B', 'C', 'D', 'E']);
    }

    #[test]
    fn iter_mut_is_double_ended_and_exact() {
        let mut table = sample();
        let mut rows = table.iter_mut();
        assert_eq!(rows.len(), 5);
        let (n, _) = rows.next_back().unwrap();
        *n = 40;
        let (n, _) = rows.nth(1).unwrap();
        *n = 10;
        assert_eq!(rows.len(), 2);
        let (n, _) = rows.nth_back(1).unwrap();
        *n = 20;
        assert!(rows.nth(0).is_none());
        assert_eq!(table.column::<0>(), &[0, 10, 20, 3, 40]);
    }

    #[test]
    fn iter_mut_nth_past_end_exhausts() {
        let mut table = sample();
        let mut rows = table.iter_mut();
        assert!(rows.nth(10).is_none());
        assert_eq!(rows.len(), 0);
        assert!(rows.next().is_none());
    }
}

#[cfg(test)]
mod slot_index {
    use soa_core::RowId;

    use crate::index::SlotIndex;

    fn slot_index_with_capacity(capacity: usize) -> SlotIndex {
        let mut index = SlotIndex::default();
        index.grow(capacity);
        index
    }

    #[test]
    fn fresh_slots_fill_in_order() {
        let mut index = slot_index_with_capacity(3);
        let ids: Vec<RowId> = (0..3).map(|_| index.push()).collect();
        for (slot, id) in ids.iter().enumerate() {
            assert_eq!(id.slot_index(), slot);
            assert_eq!(id.generation(), 2);
            assert_eq!(index.resolve(*id), Some(slot));
        }
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn freed_slots_are_reused_last_in_first_out() {
        let mut index = slot_index_with_capacity(4);
        let ids: Vec<RowId> = (0..3).map(|_| index.push()).collect();
        assert_eq!(index.remove(ids[1]), Some(1));
        assert_eq!(index.remove(ids[0]), Some(0));
        assert_eq!(index.remove(ids[0]), None);

        let a = index.push();
        let b = index.push();
        let c = index.push();
        assert_eq!((a.slot(), b.slot(), c.slot()), (0, 1, 3));
        assert_eq!(a.generation(), 4);
        assert_eq!(c.generation(), 2);
    }

    #[test]
    fn growth_keeps_freed_slots_on_top() {
        let mut index = slot_index_with_capacity(2);
        let first = index.push();
        index.push();
        index.remove(first);
        index.grow(4);
        assert_eq!(index.push().slot(), 0);
        assert_eq!(index.push().slot(), 2);
        assert_eq!(index.push().slot(), 3);
    }

    #[test]
    fn rows_never_move() {
        let mut index = slot_index_with_capacity(3);
        let ids: Vec<RowId> = (0..3).map(|_| index.push()).collect();
        index.remove(ids[0]);
        assert_eq!(index.resolve(ids[1]), Some(1));
        assert_eq!(index.resolve(ids[2]), Some(2));
        assert_eq!(index.id_in(0), None);
        assert_eq!(index.id_in(2), Some(ids[2]));
    }

    #[test]
    fn clear_vacates_everything() {
        let mut index = slot_index_with_capacity(3);
        let ids: Vec<RowId> = (0..3).map(|_| index.push()).collect();
        index.clear();
        assert_eq!(index.len(), 0);
        assert_eq!(index.capacity(), 3);
        for id in ids {
            assert_eq!(index.resolve(id), None);
        }
        assert_eq!(index.push().generation(), 4);
    }

    #[test]
    fn vacant_and_foreign_ids_never_resolve() {
        let index = slot_index_with_capacity(2);
        assert_eq!(index.resolve(RowId::vacant(0)), None);
        assert_eq!(index.resolve(RowId::INVALID), None);
        assert_eq!(index.resolve(RowId::new(7, 2)), None);
    }

    #[test]
    #[should_panic(expected = "no spare capacity")]
    fn push_without_capacity_panics() {
        SlotIndex::default().push();
    }
}

#[cfg(test)]
mod sparse {
    use std::rc::Rc;

    use crate::{RowId, SparseTable};

    fn values<L, const I: usize>(table: &SparseTable<L>) -> Vec<<L as crate::Field<I>>::Type>
    where
        L: crate::Field<I>,
        <L as crate::Field<I>>::Type: Clone,
    {
        table.column::<I>().map(|(_, v)| v.clone()).collect()
    }

    #[test]
    fn base() {
        let mut table: SparseTable<(i32, f64, bool)> = SparseTable::new();
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), 0);

        let fst = table.insert((1, 0.1, true));
        let sec = table.insert((2, 0.2, false));
        let _thd = table.insert((3, 0.3, false));

        assert_eq!(table.len(), 3);
        assert_eq!(table.capacity(), 4);

        assert_eq!(values::<_, 0>(&table), [1, 2, 3]);
        assert_eq!(values::<_, 1>(&table), [0.1, 0.2, 0.3]);
        assert_eq!(values::<_, 2>(&table), [true, false, false]);

        assert!(table.remove(sec).is_some());
        assert!(table.remove(fst).is_some());
        assert_eq!(table.len(), 1);

        // The most recently freed slot (the first) is reused.
        table.insert((4, 0.4, true));
        assert_eq!(values::<_, 0>(&table), [4, 3]);
        assert_eq!(values::<_, 1>(&table), [0.4, 0.3]);
        assert_eq!(values::<_, 2>(&table), [true, false]);
    }

    #[test]
    fn strings() {
        let mut table: SparseTable<(i32, String)> = SparseTable::new();
        table.insert((1, "kek".into()));
        let lol = table.insert((2, "lol".into()));
        table.insert((3, "three".into()));
        table.insert((4, "four".into()));

        assert_eq!(values::<_, 0>(&table), [1, 2, 3, 4]);
        assert_eq!(values::<_, 1>(&table), ["kek", "lol", "three", "four"]);

        assert_eq!(table.remove(lol), Some((2, "lol".to_string())));

        // Removal leaves a hole; nothing moves into it.
        assert_eq!(values::<_, 0>(&table), [1, 3, 4]);
        assert_eq!(values::<_, 1>(&table), ["kek", "three", "four"]);
    }

    #[test]
    fn values_are_dropped_exactly_once() {
        let token = Rc::new(());
        let mut table: SparseTable<(u32, Rc<()>)> = SparseTable::with_capacity(32);
        let ids: Vec<RowId> = (0..4).map(|i| table.insert((i, Rc::clone(&token)))).collect();
        assert_eq!(Rc::strong_count(&token), 5);

        drop(table.remove(ids[1]));
        assert_eq!(Rc::strong_count(&token), 4);

        table.reserve(64);
        assert_eq!(Rc::strong_count(&token), 4);

        drop(table);
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn clear_drops_values_and_keeps_slots() {
        let token = Rc::new(());
        let mut table: SparseTable<(Rc<()>,)> = SparseTable::new();
        let id = table.insert((Rc::clone(&token),));
        table.insert((Rc::clone(&token),));
        let cap = table.capacity();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), cap);
        assert_eq!(Rc::strong_count(&token), 1);
        assert!(!table.contains(id));
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn ids_survive_other_removals_and_growth() {
        let mut table: SparseTable<(u32, char)> = SparseTable::new();
        let a = table.insert((1, 'a'));
        let b = table.insert((2, 'b'));
        let c = table.insert((3, 'c'));
        table.remove(a);
        table.extend((10..100).map(|i| (i, 'x')));

        assert_eq!(table.get(b), Some((&2, &'b')));
        assert_eq!(table.get(c), Some((&3, &'c')));
        assert_eq!(b.slot(), 1);
        assert!(table.get(a).is_none());
        assert_eq!(table.remove(a), None);
        assert_eq!(table.field::<1>(c), Some(&'c'));
        assert_eq!(table.field::<1>(a), None);
    }

    #[test]
    fn stale_id_does_not_match_slot_reuse() {
        let mut table: SparseTable<(u8,)> = SparseTable::new();
        let old = table.insert((1,));
        table.remove(old);
        let new = table.insert((2,));
        assert_eq!(new.slot(), old.slot());
        assert_ne!(new, old);
        assert!(table.get(old).is_none());
        assert_eq!(table.get(new), Some((&2,)));
    }

    #[test]
    fn for_each_row_visits_live_rows_in_slot_order() {
        let mut table: SparseTable<(u32, String)> =
            (0..5).map(|i| (i, i.to_string())).collect();
        let third = table.ids().nth(2).unwrap();
        table.remove(third);

        let mut seen = Vec::new();
        table.for_each_row(|id, (n, s)| {
            *n *= 10;
            s.push('!');
            seen.push(id.slot());
        });
        assert_eq!(seen, [0, 1, 3, 4]);
        assert_eq!(values::<_, 0>(&table), [0, 10, 30, 40]);
        assert_eq!(values::<_, 1>(&table), ["0!", "1!", "3!", "4!"]);
    }

    #[test]
    fn column_pairs_carry_ids() {
        let mut table: SparseTable<(u8, u8)> = SparseTable::new();
        let a = table.insert((1, 10));
        let b = table.insert((2, 20));
        let c = table.insert((3, 30));
        table.remove(b);

        let pairs: Vec<_> = table.column::<1>().collect();
        assert_eq!(pairs, [(a, &10), (c, &30)]);
        assert_eq!(table.column::<1>().len(), 2);

        for (_, v) in table.column_mut::<0>() {
            *v += 100;
        }
        assert_eq!(table.get(c), Some((&103, &30)));
    }

    #[test]
    fn iter_and_get_mut() {
        let mut table: SparseTable<(i32, i32)> = SparseTable::new();
        let ids: Vec<RowId> = (0..4).map(|i| table.insert((i, -i))).collect();
        table.remove(ids[0]);

        let (x, y) = table.get_mut(ids[3]).unwrap();
        std::mem::swap(x, y);

        let rows: Vec<_> = table.iter().map(|(id, (x, y))| (id, *x, *y)).collect();
        assert_eq!(rows, [(ids[1], 1, -1), (ids[2], 2, -2), (ids[3], -3, 3)]);
        assert_eq!(table.iter().len(), 3);
        assert_eq!(table.ids().collect::<Vec<_>>(), &ids[1..]);

        for (_, (x, _)) in &mut table {
            *x = 0;
        }
        assert!((&table).into_iter().all(|(_, (x, _))| *x == 0));
    }

    #[test]
    fn clone_is_deep() {
        let mut table: SparseTable<(String,)> = SparseTable::with_capacity(8);
        let id = table.insert(("a".into(),));
        let mut copy = table.clone();
        assert_eq!(copy.capacity(), 8);
        copy.get_mut(id).unwrap().0.push('!');
        assert_eq!(table.field::<0>(id).unwrap(), "a");
        assert_eq!(copy.field::<0>(id).unwrap(), "a!");
    }

    #[test]
    fn debug_reports_shape() {
        let table: SparseTable<(u8, u8, u8)> = SparseTable::with_capacity(2);
        assert_eq!(
            format!("{table:?}"),
            "SparseTable { arity: 3, len: 0, capacity: 2 }"
        );
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum")]
    fn reserve_past_max_rows_panics() {
        let mut table: SparseTable<((),)> = SparseTable::new();
        table.reserve(crate::MAX_ROWS + 1);
    }
}

#[cfg(test)]
mod builder {
    use crate::{SparseTable, Table, TableBuilder, TableConfig, TableError};

    #[test]
    fn initial_capacity_is_exact() {
        let table: Table<(u8, u16)> = TableBuilder::new().initial_capacity(37).build().unwrap();
        assert_eq!(table.capacity(), 37);
        assert!(table.is_empty());
    }

    #[test]
    fn growth_factor_is_applied() {
        let mut table: Table<(u8,)> = TableBuilder::new()
            .initial_capacity(2)
            .growth_factor(3)
            .build()
            .unwrap();
        for i in 0..3 {
            table.emplace_row((i,));
        }
        assert_eq!(table.capacity(), 6);
        assert_eq!(table.config().growth_factor, 3);
    }

    #[test]
    fn invalid_factor_is_rejected() {
        let result: Result<Table<(u8,)>, _> = TableBuilder::new().growth_factor(1).build();
        assert!(matches!(result, Err(TableError::Config(_))));
    }

    #[test]
    fn oversized_factor_is_rejected() {
        let result: Result<Table<(u8,)>, _> = TableBuilder::new()
            .growth_factor(crate::MAX_GROWTH_FACTOR + 1)
            .build();
        assert!(matches!(result, Err(TableError::Config(_))));
        let sparse = TableBuilder::<(u8,)>::new().growth_factor(u32::MAX).build_sparse();
        assert!(matches!(sparse, Err(TableError::Config(_))));
    }

    #[test]
    fn build_sparse_applies_config() {
        let mut table: SparseTable<(u8,)> = TableBuilder::new()
            .initial_capacity(2)
            .growth_factor(4)
            .build_sparse()
            .unwrap();
        assert_eq!(table.capacity(), 2);
        for i in 0..3 {
            table.insert((i,));
        }
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn from_config_round_trip() {
        let config = TableConfig {
            initial_capacity: 8,
            growth_factor: 2,
        };
        let table: Table<(u8,)> = TableBuilder::from_config(config.clone()).build().unwrap();
        assert_eq!(table.config(), &config);
        assert_eq!(table.capacity(), 8);
    }
}

#[cfg(test)]
mod properties {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use crate::{RowId, SparseTable, Table};

    #[derive(Debug, Clone)]
    enum Op {
        Emplace(u32),
        Erase(usize),
        Remove(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u32>().prop_map(Op::Emplace),
            1 => any::<usize>().prop_map(Op::Erase),
            1 => any::<usize>().prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// The table behaves like a `Vec` of rows under `swap_remove`, and every
        /// live id resolves to the row it was issued for.
        #[test]
        fn matches_vec_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut table: Table<(u32, String, u8)> = Table::new();
            let mut model: Vec<(u32, String, u8)> = Vec::new();
            let mut ids: Vec<(RowId, u32)> = Vec::new();
            let mut emplaced = 0usize;
            let mut erased = 0usize;

            for op in ops {
                match op {
                    Op::Emplace(v) => {
                        let row = (v, v.to_string(), (v % 251) as u8);
                        let id = table.insert(row.clone());
                        model.push(row);
                        ids.push((id, v));
                        emplaced += 1;
                    }
                    Op::Erase(i) if !model.is_empty() => {
                        let i = i % model.len();
                        let expected = model.swap_remove(i);
                        prop_assert_eq!(table.erase_row(i).unwrap(), expected);
                        erased += 1;
                    }
                    Op::Remove(i) if !ids.is_empty() => {
                        let (id, _) = ids.swap_remove(i % ids.len());
                        if let Ok(pos) = table.position(id) {
                            let expected = model.swap_remove(pos);
                            prop_assert_eq!(table.remove(id), Some(expected));
                            erased += 1;
                        } else {
                            prop_assert!(table.remove(id).is_none());
                        }
                    }
                    _ => prop_assert!(table.erase_row(0).is_err()),
                }

                prop_assert_eq!(table.len(), emplaced - erased);
                prop_assert_eq!(table.column::<0>().len(), table.len());
                prop_assert_eq!(table.column::<1>().len(), table.len());
                prop_assert_eq!(table.column::<2>().len(), table.len());
                prop_assert_eq!(table.ids().len(), table.len());
                prop_assert!(table.capacity() >= table.len());
            }

            for (i, row) in table.iter().enumerate() {
                let (a, b, c) = row.get();
                prop_assert_eq!((a, b, c), (&model[i].0, &model[i].1, &model[i].2));
            }
            for (id, v) in ids {
                if let Some(row) = table.get(id) {
                    prop_assert_eq!(*row.field::<0>(), v);
                }
            }
        }

        /// Rows in a sparse table never move: every live id keeps resolving
        /// to its own values, and iteration is slot order.
        #[test]
        fn sparse_matches_map_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut table: SparseTable<(u32, String)> = SparseTable::new();
            let mut model: BTreeMap<u32, (RowId, u32)> = BTreeMap::new();
            let mut issued: Vec<RowId> = Vec::new();

            for op in ops {
                match op {
                    Op::Emplace(v) => {
                        let id = table.insert((v, v.to_string()));
                        prop_assert!(model.insert(id.slot(), (id, v)).is_none());
                        issued.push(id);
                    }
                    Op::Erase(i) | Op::Remove(i) if !issued.is_empty() => {
                        let id = issued[i % issued.len()];
                        let live = model.get(&id.slot()).is_some_and(|(live, _)| *live == id);
                        let removed = table.remove(id);
                        prop_assert_eq!(removed.is_some(), live);
                        if let Some((v, s)) = removed {
                            prop_assert_eq!(s, v.to_string());
                            model.remove(&id.slot());
                        }
                    }
                    _ => prop_assert!(table.is_empty()),
                }
                prop_assert_eq!(table.len(), model.len());
                prop_assert!(table.capacity() >= table.len());
            }

            let rows: Vec<(RowId, u32)> = table.iter().map(|(id, (v, _))| (id, *v)).collect();
            let expected: Vec<(RowId, u32)> = model.values().copied().collect();
            prop_assert_eq!(rows, expected);
        }

        #[test]
        fn capacity_covers_every_insert(n in 0usize..2_000) {
            let mut table: Table<(usize, u8)> = Table::new();
            for i in 0..n {
                table.emplace_row((i, 0));
            }
            prop_assert!(table.capacity() >= n);
            prop_assert!(table.column::<0>().iter().copied().eq(0..n));
        }
    }
}
