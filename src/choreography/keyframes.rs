//! Recorded keyframe tables.
//!
//! A [`KeyframeTable`] holds timed positions per agent slot, typically
//! exported from an animation tool. It is loaded once when a routine is
//! built and never changes afterwards.
//!
//! # CSV format
//!
//! One keyframe per line, `index,time,x,y,z`. Blank lines and an optional
//! header on the first line are skipped. Numbers may be written as floats
//! (`3.0` is slot 3) and must be finite.
//!
//! ```text
//! index,time,x,y,z
//! 0,0.0,-120.5,0.0,40.0
//! 0,0.1,-118.0,0.0,52.5
//! ```
//!
//! # JSON format
//!
//! Files ending in `.json` hold an array of objects with the same fields:
//!
//! ```json
//! [{ "index": 0, "time": 0.0, "x": -120.5, "y": 0.0, "z": 40.0 }]
//! ```

use std::path::Path;

use glam::Vec3;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::choreography::error::{ChoreographyError, Result};
use crate::choreography::interpolation::{Kinematic, lerp_v3, sample_kinematics};

/// One recorded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub position: Vec3,
}

/// Raw row as it appears in a table file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct KeyframeRow {
    pub index: usize,
    pub time: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl KeyframeRow {
    fn check_finite(&self, line: usize) -> Result<()> {
        let fields = [("time", self.time), ("x", self.x), ("y", self.y), ("z", self.z)];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(ChoreographyError::Keyframes {
                line,
                reason: format!("{} is {}, expected a finite number", name, v),
            }),
            None => Ok(()),
        }
    }
}

fn parse_row(fields: &[&str], line: usize) -> Result<KeyframeRow> {
    if fields.len() != 5 {
        return Err(ChoreographyError::Keyframes {
            line,
            reason: format!("expected 5 fields, found {}", fields.len()),
        });
    }
    let mut values = [0.0f64; 5];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field.parse().map_err(|_| ChoreographyError::Keyframes {
            line,
            reason: format!("'{}' is not a number", field),
        })?;
    }
    let index = values[0];
    if !index.is_finite() || index < 0.0 || index.fract() != 0.0 {
        return Err(ChoreographyError::Keyframes {
            line,
            reason: format!("slot index {} is not a non-negative integer", index),
        });
    }
    let row = KeyframeRow {
        index: index as usize,
        time: values[1] as f32,
        x: values[2] as f32,
        y: values[3] as f32,
        z: values[4] as f32,
    };
    row.check_finite(line)?;
    Ok(row)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeTable {
    slots: FxHashMap<usize, Vec<Keyframe>>,
}

impl KeyframeTable {
    /// Group rows by slot and sort each slot's frames by time.
    ///
    /// Fails on the first row holding a non-finite number. Rows are counted
    /// from 1 in the error.
    pub fn from_rows(rows: impl IntoIterator<Item = KeyframeRow>) -> Result<Self> {
        let mut slots: FxHashMap<usize, Vec<Keyframe>> = FxHashMap::default();
        for (n, row) in rows.into_iter().enumerate() {
            row.check_finite(n + 1)?;
            slots.entry(row.index).or_default().push(Keyframe {
                time: row.time,
                position: Vec3::new(row.x, row.y, row.z),
            });
        }
        for frames in slots.values_mut() {
            frames.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        Ok(Self { slots })
    }

    /// Load from a `.json` or CSV file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table = if path.extension().is_some_and(|ext| ext == "json") {
            let rows: Vec<KeyframeRow> =
                serde_json::from_str(&text).map_err(|e| ChoreographyError::Keyframes {
                    line: e.line(),
                    reason: e.to_string(),
                })?;
            Self::from_rows(rows)?
        } else {
            Self::parse_csv(&text)?
        };
        info!(
            "Loaded {} keyframe slots ({:.2}s) from {}",
            table.slots.len(),
            table.duration(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV text. Only the first non-blank line may be a header; every
    /// other line must be a well-formed row.
    pub fn parse_csv(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        let mut header_checked = false;
        for (n, raw) in text.lines().enumerate() {
            let line = n + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let fields: Vec<&str> = raw.split(',').map(|f| f.trim().trim_matches('"')).collect();
            if !header_checked {
                header_checked = true;
                if fields[0].parse::<f64>().is_err() {
                    continue;
                }
            }
            rows.push(parse_row(&fields, line)?);
        }
        Self::from_rows(rows)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots with data, ascending.
    pub fn slots(&self) -> Vec<usize> {
        let mut slots: Vec<usize> = self.slots.keys().copied().collect();
        slots.sort_unstable();
        slots
    }

    pub fn frames(&self, slot: usize) -> Option<&[Keyframe]> {
        self.slots.get(&slot).map(|f| f.as_slice())
    }

    /// Earliest keyframe of a slot.
    pub fn first(&self, slot: usize) -> Option<Keyframe> {
        self.slots.get(&slot).and_then(|f| f.first()).copied()
    }

    /// Time of the latest keyframe in the table.
    pub fn duration(&self) -> f32 {
        self.slots
            .values()
            .filter_map(|f| f.last())
            .map(|k| k.time)
            .fold(0.0, f32::max)
    }

    /// Position of `slot` at time `t`, linearly interpolated between
    /// keyframes and held at the first/last keyframe outside the recording.
    pub fn position_at(&self, slot: usize, t: f32) -> Option<Vec3> {
        let frames = self.slots.get(&slot)?;
        let first = frames.first()?;
        let last = frames.last()?;
        if t <= first.time {
            return Some(first.position);
        }
        if t >= last.time {
            return Some(last.position);
        }
        let next = frames.partition_point(|k| k.time <= t);
        let (Some(&a), Some(&b)) = (next.checked_sub(1).and_then(|i| frames.get(i)), frames.get(next))
        else {
            return Some(first.position);
        };
        let span = b.time - a.time;
        if span <= 0.0 {
            return Some(b.position);
        }
        Some(lerp_v3(a.position, b.position, (t - a.time) / span))
    }

    /// Position and finite-difference velocity of `slot` at `t`.
    pub fn sample(&self, slot: usize, t: f32, dt: f32) -> Result<Kinematic> {
        let frames = self
            .slots
            .get(&slot)
            .filter(|f| !f.is_empty())
            .ok_or(ChoreographyError::MissingSlot(slot))?;
        let first = frames[0].position;
        sample_kinematics(|t| self.position_at(slot, t).unwrap_or(first), t, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    const SAMPLE: &str = "index,time,x,y,z\n\
        1.0,0.0,0.0,0.0,0.0\n\
        0.0,1.0,10.0,0.0,0.0\n\
        0.0,0.0,0.0,0.0,0.0\n\
        \n\
        1.0,2.0,0.0,20.0,0.0\n";

    #[test]
    fn test_parse_groups_and_sorts_by_time() {
        let table = KeyframeTable::parse_csv(SAMPLE).unwrap();
        assert_eq!(table.slots(), vec![0, 1]);
        let times: Vec<f32> = table.frames(0).unwrap().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 1.0]);
        assert!((table.duration() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_parse_without_header() {
        let table = KeyframeTable::parse_csv("3,0.5,1,2,3").unwrap();
        assert_eq!(table.first(3).map(|k| k.position), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = KeyframeTable::parse_csv("0,0,0,0,0\n0,0.1,zero,0,0\n").unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 2, .. }), "{err}");

        let err = KeyframeTable::parse_csv("0,0,0,0\n").unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 1, .. }));

        let err = KeyframeTable::parse_csv("1.5,0,0,0,0\n").unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_non_finite_values() {
        let err = KeyframeTable::parse_csv("0,NaN,1,2,3\n").unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 1, .. }), "{err}");

        let err = KeyframeTable::parse_csv("index,time,x,y,z\n0,0.0,1,inf,3\n").unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 2, .. }), "{err}");

        // Finite as f64, infinite once narrowed to f32.
        let err = KeyframeTable::parse_csv("0,0.0,1e300,0,0\n").unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 1, .. }), "{err}");
    }

    #[test]
    fn test_from_rows_rejects_non_finite_values() {
        let rows = vec![
            KeyframeRow { index: 0, time: 0.0, x: 0.0, y: 0.0, z: 0.0 },
            KeyframeRow { index: 0, time: f32::NAN, x: 0.0, y: 0.0, z: 0.0 },
        ];
        assert!(matches!(
            KeyframeTable::from_rows(rows),
            Err(ChoreographyError::Keyframes { line: 2, .. })
        ));
    }

    #[test]
    fn test_position_tolerates_incomparable_times() {
        let mut slots = FxHashMap::default();
        slots.insert(0, vec![Keyframe { time: f32::NAN, position: Vec3::ONE }]);
        let table = KeyframeTable { slots };
        assert_eq!(table.position_at(0, 1.0), Some(Vec3::ONE));
    }

    #[test]
    fn test_only_first_line_may_be_header() {
        let err = KeyframeTable::parse_csv("index,time,x,y,z\nO,0.0,1,1,1\n0,0.5,2,2,2\n")
            .unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 2, .. }), "{err}");

        let err = KeyframeTable::parse_csv("\nindex,time,x,y,z\nslot,time,x,y,z\n").unwrap_err();
        assert!(matches!(err, ChoreographyError::Keyframes { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_position_interpolates_and_clamps() {
        let table = KeyframeTable::parse_csv(SAMPLE).unwrap();
        assert!(vec_approx_eq(table.position_at(0, 0.25).unwrap(), Vec3::new(2.5, 0.0, 0.0)));
        assert!(vec_approx_eq(table.position_at(0, -1.0).unwrap(), Vec3::ZERO));
        assert!(vec_approx_eq(table.position_at(0, 5.0).unwrap(), Vec3::new(10.0, 0.0, 0.0)));
        assert!(table.position_at(7, 0.0).is_none());
    }

    #[test]
    fn test_sample_velocity_between_keyframes() {
        let table = KeyframeTable::parse_csv(SAMPLE).unwrap();
        let k = table.sample(1, 1.0, 0.01).unwrap();
        assert!(vec_approx_eq(k.position, Vec3::new(0.0, 10.0, 0.0)));
        assert!((k.velocity.y - 10.0).abs() < 1e-2);
    }

    #[test]
    fn test_sample_missing_slot() {
        let table = KeyframeTable::parse_csv(SAMPLE).unwrap();
        assert_eq!(table.sample(4, 0.0, 0.01), Err(ChoreographyError::MissingSlot(4)));
    }
}
