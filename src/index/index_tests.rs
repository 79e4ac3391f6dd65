use super::*;
use crate::arith::{ArithmeticDispatch, Operand};
use crate::column::{CmpOp, DurationArray, Repeats, SliceSpec};
use crate::types::unit::{NANOS_PER_DAY, NANOS_PER_HOUR};
use crate::types::NAT;
use bitvec::prelude::*;

fn central() -> TimeZoneId {
    TimeZoneId::parse("US/Central").unwrap()
}

/// Three days starting at 2000-01-01 00:00 Chicago time, freq "D".
fn daily() -> DatetimeTzIndex {
    let start = Timestamp::from_utc_nanos(946_706_400_000_000_000, Some(central()));
    DatetimeTzIndex::date_range(start, 3, Freq::parse("D").unwrap())
        .unwrap()
        .named("when")
}

//==================================================================================
// Freq bookkeeping
//==================================================================================

#[test]
fn test_slices_scale_freq() {
    let idx = daily();
    let reversed = idx.get(&Indexer::Slice(SliceSpec::reversed())).unwrap().into_column().unwrap();
    assert_eq!(reversed.freq().unwrap().step(), -NANOS_PER_DAY);
    assert_eq!(reversed.name(), Some("when"));

    let every_other = idx
        .get(&Indexer::Slice(SliceSpec::new(None, None, Some(2))))
        .unwrap()
        .into_column()
        .unwrap();
    assert_eq!(every_other.freqstr().as_deref(), Some("2D"));
    assert_eq!(every_other.len(), 2);
}

#[test]
fn test_slice_drops_freq_when_scaling_overflows() {
    let idx = daily();
    let first_only = idx
        .get(&Indexer::Slice(SliceSpec::new(None, None, Some(1_000_000_000_000))))
        .unwrap()
        .into_column()
        .unwrap();
    assert_eq!(first_only.len(), 1);
    assert_eq!(first_only.asi8(), &idx.asi8()[..1]);
    assert!(first_only.freq().is_none());

    let last_only = idx
        .get(&Indexer::Slice(SliceSpec::new(None, None, Some(i64::MIN))))
        .unwrap()
        .into_column()
        .unwrap();
    assert_eq!(last_only.asi8(), &idx.asi8()[2..]);
}

#[test]
fn test_take_mask_repeat_concat_reset_freq() {
    let idx = daily();
    assert!(idx.take(&[0, 1], false, None).unwrap().freq().is_none());
    let masked = idx.get(&Indexer::Mask(bitvec![1, 0, 1])).unwrap().into_column().unwrap();
    assert!(masked.freq().is_none());
    assert!(idx.repeat(Repeats::Uniform(2)).unwrap().freq().is_none());
    let joined = DatetimeTzIndex::concat(&[&idx, &idx]).unwrap();
    assert!(joined.freq().is_none());
    assert_eq!(joined.name(), Some("when"));
    assert_eq!(joined.len(), 6);
}

#[test]
fn test_concat_drops_conflicting_names() {
    let a = daily();
    let b = daily().named("other");
    assert_eq!(DatetimeTzIndex::concat(&[&a, &b]).unwrap().name(), None);

    let naive = DatetimeTzIndex::new(DatetimeTzArray::from_i64(vec![1], None));
    assert!(matches!(a.append(&naive), Err(ChronocolError::InvalidValue(_))));
}

#[test]
fn test_tz_convert_keeps_freq_and_localize_resets_it() {
    let idx = daily();
    let converted = idx.tz_convert(TimeZoneId::Utc).unwrap();
    assert_eq!(converted.freq(), idx.freq());
    assert_eq!(converted.asi8(), idx.asi8());
    assert_eq!(converted.name(), Some("when"));

    let naive = idx.tz_localize(None, idx.localize_options()).unwrap();
    assert!(naive.freq().is_none());
    assert!(naive.tz().is_none());
}

#[test]
fn test_sort_values_orients_freq() {
    let idx = daily();
    let (desc, order) = idx.sort_values_with_indexer(false);
    assert_eq!(order, vec![2, 1, 0]);
    assert_eq!(desc.freq().unwrap().step(), -NANOS_PER_DAY);
    assert_eq!(desc.sort_values(true).freq().unwrap().step(), NANOS_PER_DAY);
}

#[test]
fn test_shift_requires_freq() {
    let idx = daily();
    let shifted = idx.shift(2, None).unwrap();
    assert_eq!(shifted.asi8()[0], idx.asi8()[0] + 2 * NANOS_PER_DAY);
    assert_eq!(shifted.freq(), idx.freq());

    let hourly = idx.shift(-1, Some(Freq::parse("H").unwrap())).unwrap();
    assert_eq!(hourly.asi8()[0], idx.asi8()[0] - NANOS_PER_HOUR);

    let plain = DatetimeTzIndex::new(DatetimeTzArray::from_i64(vec![1, 2], None));
    let err = plain.shift(1, None).unwrap_err();
    assert!(err.to_string().contains("Cannot shift with no freq"));
}

#[test]
fn test_with_freq_validates_and_inferred_freq() {
    let plain = DatetimeTzIndex::new(DatetimeTzArray::from_i64(vec![0, 10, 20], None));
    assert_eq!(plain.inferred_freq().unwrap().step(), 10);
    assert!(plain.with_freq(Some(Freq::new(10).unwrap())).is_ok());
    assert!(matches!(
        plain.with_freq(Some(Freq::new(5).unwrap())),
        Err(ChronocolError::InvalidValue(_))
    ));

    let short = DatetimeTzIndex::new(DatetimeTzArray::from_i64(vec![0, 10], None));
    assert!(short.inferred_freq().is_none());
    let gappy = DatetimeTzIndex::new(DatetimeTzArray::from_i64(vec![0, NAT, 20], None));
    assert!(gappy.inferred_freq().is_none());
}

//==================================================================================
// Arithmetic
//==================================================================================

#[test]
fn test_add_duration_keeps_name_and_freq() {
    let idx = daily();
    let out = idx
        .add(Duration::from_nanos(NANOS_PER_HOUR).into())
        .unwrap()
        .into_option()
        .unwrap()
        .into_datetime()
        .unwrap();
    assert_eq!(out.freq(), idx.freq());
    assert_eq!(out.name(), Some("when"));
    assert_eq!(out.asi8()[0], idx.asi8()[0] + NANOS_PER_HOUR);
}

#[test]
fn test_index_difference_is_duration_index() {
    let left = daily();
    let right = daily().rename(None);
    let out = left
        .sub(Operand::DatetimeIndex(&right))
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(out.name(), Some("when"));
    let durations = out.into_duration().unwrap();
    assert_eq!(durations.asi8(), &[0, 0, 0]);

    // Only the right operand is named.
    let unnamed = daily().rename(None);
    let out = unnamed.sub(Operand::DatetimeIndex(&left)).unwrap().into_option().unwrap();
    assert_eq!(out.name(), Some("when"));
}

#[test]
fn test_index_arith_rules_carry_through() {
    let idx = daily();
    assert!(matches!(
        idx.add(Operand::DatetimeIndex(&idx)),
        Err(ChronocolError::TypeMismatch(_))
    ));
    assert!(idx.add(Operand::Int(3)).unwrap().is_not_implemented());

    let deltas = DurationArray::from_nanos(vec![1, 2, 3]);
    let out = idx
        .add(Operand::Durations(&deltas))
        .unwrap()
        .into_option()
        .unwrap()
        .into_datetime()
        .unwrap();
    assert!(out.freq().is_none());
}

//==================================================================================
// Lookup, boxing, summary
//==================================================================================

#[test]
fn test_get_loc_and_contains() {
    let data = DatetimeTzArray::from_i64(vec![5, 7, 5, NAT], Some(TimeZoneId::Utc));
    let idx = DatetimeTzIndex::new(data);
    let seven = Timestamp::from_utc_nanos(7, Some(central()));
    assert_eq!(idx.get_loc(&seven).unwrap(), Loc::Single(1));
    let five = Timestamp::from_utc_nanos(5, Some(TimeZoneId::Utc));
    assert_eq!(idx.get_loc(&five).unwrap(), Loc::Many(vec![0, 2]));
    assert_eq!(idx.get_loc(&Timestamp::nat()).unwrap(), Loc::Single(3));

    let missing = Timestamp::from_utc_nanos(6, Some(TimeZoneId::Utc));
    assert!(matches!(idx.get_loc(&missing), Err(ChronocolError::KeyNotFound(_))));
    assert!(!idx.contains(&missing));
    assert!(!idx.contains(&Timestamp::from_utc_nanos(5, None)));
    assert!(idx.contains(&five));
}

#[test]
fn test_summary_and_display() {
    let idx = daily();
    assert_eq!(
        idx.summary(None),
        "DatetimeTzIndex: 3 entries, 2000-01-01 00:00:00-06:00 to 2000-01-03 00:00:00-06:00\nFreq: D"
    );
    let empty = DatetimeTzIndex::new(DatetimeTzArray::from_i64(vec![], None));
    assert_eq!(empty.summary(Some("Idx")), "Idx: 0 entries");

    let small = DatetimeTzIndex::new(DatetimeTzArray::from_i64(vec![0, NAT], Some(TimeZoneId::Utc)));
    assert_eq!(
        small.to_string(),
        "DatetimeTzIndex(['1970-01-01 00:00:00+00:00', 'NaT'], dtype='datetime64[ns, UTC]', freq=None)"
    );
}

#[test]
fn test_map_two_paths() {
    let idx = daily();
    let typed = idx.map(|ts| ts.checked_add(Duration::from_nanos(1)).unwrap()).unwrap();
    match typed {
        Mapped::Typed(out) => {
            assert_eq!(out.tz(), Some(&central()));
            assert_eq!(out.name(), Some("when"));
            assert!(out.freq().is_none());
        }
        Mapped::Boxed(_) => panic!("expected a typed result"),
    }

    let first = idx.asi8()[0];
    let mixed = idx
        .map(|ts| {
            if ts.value() == first {
                ts.tz_convert(TimeZoneId::Utc).unwrap()
            } else {
                ts
            }
        })
        .unwrap();
    assert!(matches!(mixed, Mapped::Boxed(ref values) if values.len() == 3));
}

#[test]
fn test_convert_tolerance_shape() {
    let idx = daily();
    let one = [Duration::from_nanos(1)];
    assert_eq!(idx.convert_tolerance(&one, 5).unwrap().len(), 1);
    let three = [Duration::from_nanos(1); 3];
    assert!(idx.convert_tolerance(&three, 3).is_ok());
    assert!(matches!(
        idx.convert_tolerance(&three, 2),
        Err(ChronocolError::InvalidValue(_))
    ));
}

#[test]
fn test_raw_delegates_and_equality() {
    let idx = daily();
    assert_eq!(idx.day(), vec![Some(1), Some(2), Some(3)]);
    assert_eq!(idx.hour(), vec![Some(0), Some(0), Some(0)]);
    assert!(idx.is_monotonic_increasing());
    assert_eq!(idx.argmax(), 2);
    let ge = idx
        .compare(Operand::Timestamp(idx.min()), CmpOp::Gt)
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(ge, bitvec![0, 1, 1]);

    assert!(idx.equals(&daily().rename(Some("x"))));
    assert!(!idx.equals(&idx.tz_convert(TimeZoneId::Utc).unwrap()));
    assert_eq!(idx.copy(true), idx);
    assert_eq!(idx.tolist().len(), 3);
}
